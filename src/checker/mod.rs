mod evaluator;
mod result;
mod rule;

pub use evaluator::ViolationEvaluator;
pub use result::{
    ClassDelta, CoverageSummary, DeltaReport, SourceLocation, Violation, ViolationResult,
};
pub use rule::{CoverageEntity, ViolationRule, ViolationRules, validate_ratio};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
