use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::checker::{CoverageEntity, ViolationRule, ViolationRules};
use crate::diff::{DiffSource, FileDiffSource, GitDiffSource, UrlDiffSource};
use crate::output::OutputFormat;
use crate::{DeltaCoverageError, Result};

/// Root of `.delta-coverage.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Class exclusion globs, matched against `pkg/Outer$Inner.class`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_classes: Vec<String>,

    #[serde(default)]
    pub diff: DiffConfig,

    #[serde(default)]
    pub coverage: CoverageConfig,

    #[serde(default)]
    pub violations: ViolationsConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// `[diff]`: exactly one of the three sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Git reference to diff the working tree against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single resolved diff source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOrigin {
    File(PathBuf),
    Git(String),
    Url(String),
}

impl DiffConfig {
    #[must_use]
    pub const fn configured_count(&self) -> usize {
        self.file.is_some() as usize + self.git.is_some() as usize + self.url.is_some() as usize
    }

    /// The configured source, if any.
    ///
    /// # Errors
    /// Returns `Config` if more than one source is set.
    pub fn origin(&self) -> Result<Option<DiffOrigin>> {
        if self.configured_count() > 1 {
            return Err(DeltaCoverageError::Config(
                "only one of diff.file, diff.git and diff.url may be set".to_string(),
            ));
        }
        Ok(self
            .file
            .clone()
            .map(DiffOrigin::File)
            .or_else(|| self.git.clone().map(DiffOrigin::Git))
            .or_else(|| self.url.clone().map(DiffOrigin::Url)))
    }
}

impl DiffOrigin {
    /// Build the source. Git references are resolved in the repository containing `workdir`.
    ///
    /// # Errors
    /// Returns `Git` if `workdir` is not inside a repository.
    pub fn into_source(self, workdir: &std::path::Path) -> Result<Box<dyn DiffSource>> {
        Ok(match self {
            Self::File(path) => Box::new(FileDiffSource::new(path)),
            Self::Git(reference) => Box::new(GitDiffSource::discover(workdir, reference)?),
            Self::Url(url) => Box::new(UrlDiffSource::new(url)),
        })
    }
}

/// `[coverage]`: report files or directories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageConfig {
    #[serde(default)]
    pub reports: Vec<PathBuf>,
}

/// `[violations]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViolationsConfig {
    /// Defaults to `true` when `fail_if_coverage_less_than` is set, else `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_violations: Option<bool>,

    /// Shorthand: one rule per entity with this minimum ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_if_coverage_less_than: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// `[[violations.rules]]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleConfig {
    pub entity: CoverageEntity,
    pub min_coverage_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_count_threshold: Option<u32>,
}

impl ViolationsConfig {
    /// Shorthand rules first, then explicit rules replacing them per entity.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if any ratio is outside `[0, 1]`.
    pub fn to_rules(&self) -> Result<ViolationRules> {
        let mut rules = match self.fail_if_coverage_less_than {
            Some(ratio) => ViolationRules::fail_if_coverage_less_than(ratio)?,
            None => ViolationRules::new(false),
        };
        rules.fail_on_violations = self
            .fail_on_violations
            .unwrap_or(self.fail_if_coverage_less_than.is_some());

        for rule in &self.rules {
            let mut resolved = ViolationRule::new(rule.entity, rule.min_coverage_ratio)?;
            if let Some(threshold) = rule.entity_count_threshold {
                resolved = resolved.with_entity_count_threshold(threshold);
            }
            rules.set(resolved);
        }
        Ok(rules)
    }
}

/// `[report]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
