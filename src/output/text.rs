use std::fmt::Write;

use crate::checker::{ClassDelta, CoverageEntity, DeltaReport};
use crate::coverage::LineCounter;
use crate::error::Result;

use super::{OutputFormatter, percent};

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct TextFormatter {
    use_colors: bool,
    verbose: u8,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self::with_verbose(mode, 0)
    }

    #[must_use]
    pub fn with_verbose(mode: ColorMode, verbose: u8) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
            verbose,
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    const fn label(entity: CoverageEntity) -> &'static str {
        match entity {
            CoverageEntity::Line => "lines",
            CoverageEntity::Branch => "branches",
            CoverageEntity::Instruction => "instructions",
        }
    }

    fn counter_text(entity: CoverageEntity, counter: LineCounter) -> String {
        format!(
            "{} {} ({} of {})",
            Self::label(entity),
            percent(counter.ratio()),
            counter.covered,
            counter.total()
        )
    }

    fn format_class(&self, class: &ClassDelta, output: &mut String) {
        let (icon, color) = if class.missed_lines.is_empty() {
            ("✓", ansi::GREEN)
        } else {
            ("✗", ansi::RED)
        };
        writeln!(
            output,
            "{} {} ({})",
            self.paint(icon, color),
            class.class_name,
            class.source_path
        )
        .ok();

        let counters: Vec<String> = CoverageEntity::ALL
            .iter()
            .map(|&entity| (entity, class.counter(entity)))
            .filter(|(_, counter)| counter.total() > 0)
            .map(|(entity, counter)| Self::counter_text(entity, counter))
            .collect();
        if !counters.is_empty() {
            writeln!(output, "    {}", counters.join(", ")).ok();
        }

        if !class.missed_lines.is_empty() {
            let lines: Vec<String> = class.missed_lines.iter().map(u32::to_string).collect();
            writeln!(output, "    uncovered lines: {}", lines.join(", ")).ok();
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &DeltaReport) -> Result<String> {
        let mut output = String::new();

        writeln!(
            output,
            "Delta coverage: {} changed file(s), {} changed line(s)",
            report.changed_files, report.changed_lines
        )
        .ok();

        if report.classes.is_empty() {
            writeln!(output, "\nNo instrumented changed lines.").ok();
        } else {
            output.push('\n');
            for class in &report.classes {
                self.format_class(class, &mut output);
            }
        }

        let summary: Vec<String> = CoverageEntity::ALL
            .iter()
            .map(|&entity| Self::counter_text(entity, report.summary.get(entity)))
            .collect();
        writeln!(output, "\nSummary: {}", summary.join(", ")).ok();

        if !report.excluded_classes.is_empty() {
            writeln!(
                output,
                "Excluded classes: {}",
                report.excluded_classes.len()
            )
            .ok();
            if self.verbose > 0 {
                for name in &report.excluded_classes {
                    writeln!(output, "  - {name}").ok();
                }
            }
        }

        if !report.result.violations.is_empty() {
            writeln!(output, "\nViolations:").ok();
            let color = if report.result.fail_on_violations {
                ansi::RED
            } else {
                ansi::YELLOW
            };
            for violation in &report.result.violations {
                writeln!(output, "  {}", self.paint(&violation.to_string(), color)).ok();
            }
        }

        writeln!(output, "\n{}", report.result.message).ok();
        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
