//! Semantic checks that TOML parsing cannot express.

use std::collections::BTreeSet;

use crate::checker::validate_ratio;
use crate::exclude::compile_pattern;
use crate::{DeltaCoverageError, Result};

use super::Config;

/// Validates semantic correctness of a configuration.
///
/// # Errors
/// Returns `Config` if a ratio is outside `[0, 1]`, more than one diff source is set,
/// or two rules target the same entity.
pub fn validate_config_semantics(config: &Config) -> Result<()> {
    validate_violations(config)?;

    if config.diff.configured_count() > 1 {
        return Err(DeltaCoverageError::Config(
            "only one of diff.file, diff.git and diff.url may be set".to_string(),
        ));
    }
    Ok(())
}

fn validate_violations(config: &Config) -> Result<()> {
    let violations = &config.violations;

    if let Some(ratio) = violations.fail_if_coverage_less_than {
        validate_ratio(ratio).map_err(|_| {
            DeltaCoverageError::Config(format!(
                "violations.fail_if_coverage_less_than must be between 0.0 and 1.0, got {ratio}"
            ))
        })?;
    }

    let mut seen = BTreeSet::new();
    for (i, rule) in violations.rules.iter().enumerate() {
        validate_ratio(rule.min_coverage_ratio).map_err(|_| {
            DeltaCoverageError::Config(format!(
                "violations.rules[{i}].min_coverage_ratio must be between 0.0 and 1.0, got {}",
                rule.min_coverage_ratio
            ))
        })?;
        if !seen.insert(rule.entity) {
            return Err(DeltaCoverageError::Config(format!(
                "violations.rules[{i}]: duplicate rule for entity '{}'",
                rule.entity
            )));
        }
    }
    Ok(())
}

/// Exclusion patterns that fail to compile. These are skipped at check time, not rejected.
#[must_use]
pub fn invalid_exclusion_patterns(config: &Config) -> Vec<String> {
    config
        .exclude_classes
        .iter()
        .filter(|pattern| compile_pattern(pattern).is_err())
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
