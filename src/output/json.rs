use serde::Serialize;

use crate::checker::{ClassDelta, DeltaReport};
use crate::coverage::LineCounter;
use crate::error::Result;

use super::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    result: ResultOutput<'a>,
    summary: SummaryOutput,
    changed_files: usize,
    changed_lines: usize,
    classes: Vec<ClassOutput<'a>>,
    excluded_classes: &'a [String],
}

#[derive(Serialize)]
struct ResultOutput<'a> {
    fail_on_violations: bool,
    violation_count: usize,
    message: &'a str,
    violations: Vec<ViolationOutput>,
}

#[derive(Serialize)]
struct ViolationOutput {
    entity: &'static str,
    expected_ratio: f64,
    actual_ratio: f64,
    covered: u32,
    total: u32,
}

#[derive(Serialize)]
struct CounterOutput {
    covered: u32,
    missed: u32,
    total: u32,
    ratio: f64,
}

impl From<LineCounter> for CounterOutput {
    fn from(counter: LineCounter) -> Self {
        Self {
            covered: counter.covered,
            missed: counter.missed,
            total: counter.total(),
            ratio: counter.ratio(),
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput {
    lines: CounterOutput,
    branches: CounterOutput,
    instructions: CounterOutput,
}

#[derive(Serialize)]
struct ClassOutput<'a> {
    class_name: &'a str,
    source_path: &'a str,
    lines: CounterOutput,
    branches: CounterOutput,
    instructions: CounterOutput,
    missed_lines: &'a [u32],
}

fn convert_class(class: &ClassDelta) -> ClassOutput<'_> {
    ClassOutput {
        class_name: &class.class_name,
        source_path: &class.source_path,
        lines: class.lines.into(),
        branches: class.branches.into(),
        instructions: class.instructions.into(),
        missed_lines: &class.missed_lines,
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &DeltaReport) -> Result<String> {
        let output = JsonOutput {
            result: ResultOutput {
                fail_on_violations: report.result.fail_on_violations,
                violation_count: report.result.violation_count,
                message: &report.result.message,
                violations: report
                    .result
                    .violations
                    .iter()
                    .map(|v| ViolationOutput {
                        entity: v.entity.as_str(),
                        expected_ratio: v.expected_ratio,
                        actual_ratio: v.actual_ratio,
                        covered: v.covered,
                        total: v.total,
                    })
                    .collect(),
            },
            summary: SummaryOutput {
                lines: report.summary.lines.into(),
                branches: report.summary.branches.into(),
                instructions: report.summary.instructions.into(),
            },
            changed_files: report.changed_files,
            changed_lines: report.changed_lines,
            classes: report.classes.iter().map(convert_class).collect(),
            excluded_classes: &report.excluded_classes,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
