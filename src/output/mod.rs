mod json;
mod markdown;
mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::{ColorMode, TextFormatter};

use serde::{Deserialize, Serialize};

use crate::checker::DeltaReport;
use crate::error::Result;

/// Trait for rendering a delta coverage report.
pub trait OutputFormatter {
    /// Format the report into a string.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, report: &DeltaReport) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Percentage with two decimals, e.g. `87.50%`.
pub(crate) fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
