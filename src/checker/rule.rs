use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DeltaCoverageError, Result};

/// What a coverage rule counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageEntity {
    Line,
    Branch,
    Instruction,
}

impl CoverageEntity {
    pub const ALL: [Self; 3] = [Self::Line, Self::Branch, Self::Instruction];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Branch => "branch",
            Self::Instruction => "instruction",
        }
    }
}

impl fmt::Display for CoverageEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoverageEntity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" | "lines" => Ok(Self::Line),
            "branch" | "branches" => Ok(Self::Branch),
            "instruction" | "instructions" => Ok(Self::Instruction),
            _ => Err(format!("Unknown coverage entity: {s}")),
        }
    }
}

/// Minimum coverage ratio required for one entity on changed code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViolationRule {
    pub entity: CoverageEntity,
    pub min_coverage_ratio: f64,
    /// Skip the rule when fewer entities than this are in scope.
    pub entity_count_threshold: Option<u32>,
}

/// Check that `ratio` is a finite number in `[0, 1]`.
///
/// # Errors
/// Returns `InvalidArgument` otherwise.
pub fn validate_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(DeltaCoverageError::InvalidArgument(format!(
            "coverage ratio must be between 0.0 and 1.0, got {ratio}"
        )))
    }
}

impl ViolationRule {
    /// # Errors
    /// Returns `InvalidArgument` if the ratio is outside `[0, 1]`.
    pub fn new(entity: CoverageEntity, min_coverage_ratio: f64) -> Result<Self> {
        validate_ratio(min_coverage_ratio)?;
        Ok(Self {
            entity,
            min_coverage_ratio,
            entity_count_threshold: None,
        })
    }

    #[must_use]
    pub const fn with_entity_count_threshold(mut self, threshold: u32) -> Self {
        self.entity_count_threshold = Some(threshold);
        self
    }
}

/// The rules of one evaluation and whether breaking them fails the build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationRules {
    pub fail_on_violations: bool,
    rules: Vec<ViolationRule>,
}

impl ViolationRules {
    #[must_use]
    pub const fn new(fail_on_violations: bool) -> Self {
        Self {
            fail_on_violations,
            rules: Vec::new(),
        }
    }

    /// One rule per entity with the same minimum ratio, failing on violations.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the ratio is outside `[0, 1]`.
    pub fn fail_if_coverage_less_than(ratio: f64) -> Result<Self> {
        let mut rules = Self::new(true);
        for entity in CoverageEntity::ALL {
            rules.set(ViolationRule::new(entity, ratio)?);
        }
        Ok(rules)
    }

    /// Add a rule, replacing any existing rule for the same entity.
    pub fn set(&mut self, rule: ViolationRule) {
        match self.rules.iter_mut().find(|r| r.entity == rule.entity) {
            Some(existing) => *existing = rule,
            None => {
                self.rules.push(rule);
                self.rules.sort_by_key(|r| r.entity);
            }
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: ViolationRule) -> Self {
        self.set(rule);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[ViolationRule] {
        &self.rules
    }

    #[must_use]
    pub fn get(&self, entity: CoverageEntity) -> Option<&ViolationRule> {
        self.rules.iter().find(|r| r.entity == entity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
