pub mod checker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod diff;
pub mod error;
pub mod exclude;
pub mod output;
pub mod path_utils;

pub use error::{DeltaCoverageError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VIOLATIONS_FOUND: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
