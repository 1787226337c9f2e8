use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeltaCoverageError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Diff parse error at line {line}: {message}")]
    DiffParse { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid coverage report: {path}")]
    CoverageReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Failed to fetch diff: {0}")]
    DiffFetch(String),
}

impl DeltaCoverageError {
    /// Short category name used in CLI error output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::DiffParse { .. } => "DiffParse",
            Self::Config(_) | Self::TomlParse(_) | Self::TomlSerialize(_) => "Config",
            Self::FileRead { .. } | Self::Io(_) => "IO",
            Self::CoverageReport { .. } => "Coverage",
            Self::InvalidPattern { .. } => "Pattern",
            Self::Json(_) => "Json",
            Self::Git(_) => "Git",
            Self::DiffFetch(_) => "DiffFetch",
        }
    }
}

pub type Result<T> = std::result::Result<T, DeltaCoverageError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
