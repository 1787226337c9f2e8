use crate::coverage::ClassCoverage;
use crate::diff::DiffIndex;
use crate::exclude::ClassExclusionFilter;
use crate::Result;

use super::{
    ClassDelta, CoverageSummary, DeltaReport, Violation, ViolationResult, ViolationRule,
    ViolationRules,
};

/// Computes delta coverage for a set of classes and checks it against rules.
///
/// Holds only immutable inputs, so one evaluator can be shared across threads.
#[derive(Debug, Clone)]
pub struct ViolationEvaluator {
    diff: DiffIndex,
    exclusions: ClassExclusionFilter,
    rules: ViolationRules,
}

impl ViolationEvaluator {
    #[must_use]
    pub const fn new(
        diff: DiffIndex,
        exclusions: ClassExclusionFilter,
        rules: ViolationRules,
    ) -> Self {
        Self {
            diff,
            exclusions,
            rules,
        }
    }

    /// Restrict one class to changed lines. `None` when nothing changed in it.
    fn class_delta(&self, coverage: &ClassCoverage) -> Result<Option<ClassDelta>> {
        let source_path = coverage.class.path()?;
        let changed = self.diff.changed_lines(&source_path);
        if changed.is_empty() {
            return Ok(None);
        }

        let scoped = coverage.counters.restrict_to(&changed);
        if scoped.is_empty() {
            return Ok(None);
        }

        Ok(Some(ClassDelta {
            class_name: coverage.class.class_name().to_string(),
            source_path,
            lines: scoped.line_counter(),
            branches: scoped.branch_counter(),
            instructions: scoped.instruction_counter(),
            missed_lines: scoped.missed_lines.into_iter().collect(),
        }))
    }

    fn check_rule(rule: &ViolationRule, summary: &CoverageSummary) -> Option<Violation> {
        let counter = summary.get(rule.entity);
        if let Some(threshold) = rule.entity_count_threshold
            && counter.total() < threshold
        {
            tracing::debug!(
                entity = %rule.entity,
                total = counter.total(),
                threshold,
                "rule skipped below entity count threshold"
            );
            return None;
        }

        let actual_ratio = counter.ratio();
        (actual_ratio < rule.min_coverage_ratio).then_some(Violation {
            entity: rule.entity,
            expected_ratio: rule.min_coverage_ratio,
            actual_ratio,
            covered: counter.covered,
            total: counter.total(),
        })
    }

    /// Build the filtered coverage view and evaluate every rule on it.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if a class has an empty name or source file name.
    pub fn analyze(&self, classes: &[ClassCoverage]) -> Result<DeltaReport> {
        let mut in_scope = Vec::new();
        let mut excluded_classes = Vec::new();

        for coverage in classes {
            let name = coverage.class.class_name();
            if self.exclusions.is_excluded(name) {
                tracing::debug!(class = name, "class excluded");
                excluded_classes.push(name.to_string());
                continue;
            }
            if let Some(delta) = self.class_delta(coverage)? {
                in_scope.push(delta);
            }
        }

        in_scope.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        excluded_classes.sort();

        let mut summary = CoverageSummary::default();
        for class in &in_scope {
            summary.add(class);
        }

        let violations: Vec<Violation> = self
            .rules
            .rules()
            .iter()
            .filter_map(|rule| Self::check_rule(rule, &summary))
            .collect();
        let result = ViolationResult::new(self.rules.fail_on_violations, violations);

        tracing::info!(
            classes = in_scope.len(),
            excluded = excluded_classes.len(),
            violations = result.violation_count,
            "delta coverage evaluated"
        );

        Ok(DeltaReport {
            classes: in_scope,
            excluded_classes,
            summary,
            result,
            changed_files: self.diff.file_count(),
            changed_lines: self.diff.changed_line_count(),
        })
    }

    /// Evaluate the rules and return only the outcome.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if a class has an empty name or source file name.
    pub fn evaluate(&self, classes: &[ClassCoverage]) -> Result<ViolationResult> {
        Ok(self.analyze(classes)?.result)
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
