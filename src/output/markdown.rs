use std::fmt::Write;

use crate::checker::{CoverageEntity, DeltaReport};
use crate::coverage::LineCounter;
use crate::error::Result;

use super::{OutputFormatter, percent};

/// Renders the report as a pull request comment.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn cell(counter: LineCounter) -> String {
        if counter.total() == 0 {
            "-".to_string()
        } else {
            format!(
                "{} ({}/{})",
                percent(counter.ratio()),
                counter.covered,
                counter.total()
            )
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, report: &DeltaReport) -> Result<String> {
        let mut output = String::new();
        let status = if report.result.is_failed() {
            "❌"
        } else if report.result.violation_count > 0 {
            "⚠️"
        } else {
            "✅"
        };

        writeln!(output, "## {status} Delta Coverage\n").ok();
        writeln!(
            output,
            "{} changed file(s), {} changed line(s).\n",
            report.changed_files, report.changed_lines
        )
        .ok();

        writeln!(output, "| Entity | Coverage |").ok();
        writeln!(output, "|--------|----------|").ok();
        for entity in CoverageEntity::ALL {
            writeln!(
                output,
                "| {entity} | {} |",
                Self::cell(report.summary.get(entity))
            )
            .ok();
        }

        if !report.classes.is_empty() {
            writeln!(output, "\n### Classes\n").ok();
            writeln!(output, "| Class | Lines | Branches | Instructions |").ok();
            writeln!(output, "|-------|-------|----------|--------------|").ok();
            for class in &report.classes {
                writeln!(
                    output,
                    "| `{}` | {} | {} | {} |",
                    class.class_name,
                    Self::cell(class.lines),
                    Self::cell(class.branches),
                    Self::cell(class.instructions)
                )
                .ok();
            }
        }

        let uncovered = report.uncovered_locations();
        if !uncovered.is_empty() {
            writeln!(
                output,
                "\n<details><summary>Uncovered changed lines ({})</summary>\n",
                uncovered.len()
            )
            .ok();
            for location in &uncovered {
                writeln!(output, "- `{location}`").ok();
            }
            writeln!(output, "\n</details>").ok();
        }

        if !report.result.violations.is_empty() {
            writeln!(output, "\n### Violations\n").ok();
            for violation in &report.result.violations {
                writeln!(output, "- {violation}").ok();
            }
        }

        if !report.excluded_classes.is_empty() {
            writeln!(
                output,
                "\n<details><summary>Excluded classes ({})</summary>\n",
                report.excluded_classes.len()
            )
            .ok();
            for name in &report.excluded_classes {
                writeln!(output, "- `{name}`").ok();
            }
            writeln!(output, "\n</details>").ok();
        }

        writeln!(output, "\n{}", report.result.message).ok();
        Ok(output)
    }
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
