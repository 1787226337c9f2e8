mod filesystem;
mod loader;
mod model;
mod validation;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME, LoadResult, parse_config};
pub use model::{
    Config, CoverageConfig, DiffConfig, DiffOrigin, ReportConfig, RuleConfig, ViolationsConfig,
};
pub use validation::{invalid_exclusion_patterns, validate_config_semantics};
