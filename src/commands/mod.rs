pub mod check;
pub mod config;
mod context;
pub mod init;

pub use check::{run_check, run_delta_coverage};
pub use config::{format_config_text, run_config};
pub use init::{generate_config_template, run_init, run_init_impl};
