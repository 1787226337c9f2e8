mod class_file;
mod loader;
mod model;

pub use class_file::{ClassFile, class_file_path, resolve_source_path};
pub use loader::{
    ClassRecord, CoverageReport, LineCounterRecord, collect_report_files, load_coverage,
    load_report,
};
pub use model::{ClassCoverage, CoverageCounters, CoverageData, LineCounter};
