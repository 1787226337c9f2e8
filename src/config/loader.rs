use std::path::{Path, PathBuf};

use crate::{DeltaCoverageError, Result};

use super::Config;
use super::filesystem::{FileSystem, RealFileSystem};

pub const LOCAL_CONFIG_NAME: &str = ".delta-coverage.toml";
const USER_CONFIG_NAME: &str = "config.toml";

/// A loaded configuration and the file it came from (`None` for built-in defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub config: Config,
    pub source: Option<PathBuf>,
}

pub trait ConfigLoader {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    /// Returns an error if a discovered config file cannot be read or parsed.
    fn load(&self) -> Result<LoadResult>;

    /// Load configuration from a specific path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;
}

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.delta-coverage.toml` in the current directory
/// 2. `config.toml` in the platform config directory
/// 3. `Config::default()`
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    fn local_config_path(&self) -> Option<PathBuf> {
        self.fs
            .current_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn read(&self, path: &Path) -> Result<LoadResult> {
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|source| DeltaCoverageError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        let config = parse_config(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(LoadResult {
            config,
            source: Some(path.to_path_buf()),
        })
    }
}

/// Parse TOML text into a `Config`.
///
/// # Errors
/// Returns `TomlParse` on syntax or schema errors.
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<LoadResult> {
        let candidates = [self.local_config_path(), self.user_config_path()];
        for path in candidates.into_iter().flatten() {
            if self.fs.exists(&path) {
                return self.read(&path);
            }
        }
        tracing::debug!("no configuration file found, using defaults");
        Ok(LoadResult {
            config: Config::default(),
            source: None,
        })
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        if !self.fs.exists(path) {
            return Err(DeltaCoverageError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        self.read(path)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
