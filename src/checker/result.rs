use std::fmt;

use crate::coverage::LineCounter;

use super::CoverageEntity;

/// One physical line of a source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file_path: String,
    pub line_number: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_path, self.line_number)
    }
}

/// A rule whose ratio on changed code fell below its minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub entity: CoverageEntity,
    pub expected_ratio: f64,
    pub actual_ratio: f64,
    pub covered: u32,
    pub total: u32,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Changed code coverage is {:.2}% ({} of {}), expected at least {:.2}%",
            self.entity,
            self.actual_ratio * 100.0,
            self.covered,
            self.total,
            self.expected_ratio * 100.0
        )
    }
}

/// Outcome of one evaluation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationResult {
    pub fail_on_violations: bool,
    pub violation_count: usize,
    pub violations: Vec<Violation>,
    pub message: String,
}

impl ViolationResult {
    #[must_use]
    pub fn new(fail_on_violations: bool, violations: Vec<Violation>) -> Self {
        let violation_count = violations.len();
        Self {
            fail_on_violations,
            violation_count,
            violations,
            message: format!(
                "Fail on violations: {fail_on_violations}. Found violations: {violation_count}"
            ),
        }
    }

    /// True when the build must fail.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.fail_on_violations && self.violation_count > 0
    }
}

/// Changed-line coverage of one class that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDelta {
    pub class_name: String,
    pub source_path: String,
    pub lines: LineCounter,
    pub branches: LineCounter,
    pub instructions: LineCounter,
    /// Changed lines that no test executed.
    pub missed_lines: Vec<u32>,
}

impl ClassDelta {
    #[must_use]
    pub const fn counter(&self, entity: CoverageEntity) -> LineCounter {
        match entity {
            CoverageEntity::Line => self.lines,
            CoverageEntity::Branch => self.branches,
            CoverageEntity::Instruction => self.instructions,
        }
    }
}

/// Aggregated counters over all classes in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub lines: LineCounter,
    pub branches: LineCounter,
    pub instructions: LineCounter,
}

impl CoverageSummary {
    #[must_use]
    pub const fn get(&self, entity: CoverageEntity) -> LineCounter {
        match entity {
            CoverageEntity::Line => self.lines,
            CoverageEntity::Branch => self.branches,
            CoverageEntity::Instruction => self.instructions,
        }
    }

    pub fn add(&mut self, class: &ClassDelta) {
        self.lines += class.lines;
        self.branches += class.branches;
        self.instructions += class.instructions;
    }
}

/// Filtered coverage view plus the violation outcome; the input to every report.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaReport {
    /// Diff-scoped, non-excluded classes, sorted by class name.
    pub classes: Vec<ClassDelta>,
    /// Names of classes dropped by exclusion patterns.
    pub excluded_classes: Vec<String>,
    pub summary: CoverageSummary,
    pub result: ViolationResult,
    pub changed_files: usize,
    pub changed_lines: usize,
}

impl DeltaReport {
    /// Every uncovered changed line, ordered by file and line.
    #[must_use]
    pub fn uncovered_locations(&self) -> Vec<SourceLocation> {
        let mut locations: Vec<SourceLocation> = self
            .classes
            .iter()
            .flat_map(|class| {
                class.missed_lines.iter().map(|&line_number| SourceLocation {
                    file_path: class.source_path.clone(),
                    line_number,
                })
            })
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }
}
