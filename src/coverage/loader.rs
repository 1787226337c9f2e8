use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{DeltaCoverageError, Result};

use super::{ClassCoverage, ClassFile, CoverageCounters, CoverageData, LineCounter};

const REPORT_EXTENSION: &str = "json";

/// Serialized coverage report: one entry per class.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageReport {
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassRecord {
    /// Qualified class name, `/` or `.` separated.
    pub name: String,
    pub source_file: String,
    #[serde(default)]
    pub covered_lines: Vec<u32>,
    #[serde(default)]
    pub missed_lines: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<LineCounterRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<LineCounterRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineCounterRecord {
    pub line: u32,
    #[serde(default)]
    pub covered: u32,
    #[serde(default)]
    pub missed: u32,
}

impl From<ClassRecord> for ClassCoverage {
    fn from(record: ClassRecord) -> Self {
        let to_entry = |r: LineCounterRecord| (r.line, LineCounter::new(r.covered, r.missed));
        let counters = CoverageCounters::from_lines(record.covered_lines, record.missed_lines)
            .with_instructions(record.instructions.into_iter().map(to_entry))
            .with_branches(record.branches.into_iter().map(to_entry));
        Self::new(ClassFile::new(record.name, record.source_file), counters)
    }
}

impl CoverageReport {
    /// Parse a report from JSON text.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid coverage report.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    #[must_use]
    pub fn into_coverage_data(self) -> CoverageData {
        self.classes.into_iter().map(ClassCoverage::from).collect()
    }
}

/// Load a single coverage report file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid report.
pub fn load_report(path: &Path) -> Result<CoverageData> {
    let content = std::fs::read_to_string(path).map_err(|source| DeltaCoverageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let report: CoverageReport =
        serde_json::from_str(&content).map_err(|source| DeltaCoverageError::CoverageReport {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        classes = report.classes.len(),
        "loaded coverage report"
    );
    Ok(report.into_coverage_data())
}

/// Expand report paths: files are kept, directories are walked for `*.json`.
///
/// # Errors
/// Returns an error if a path does not exist or a directory cannot be walked.
pub fn collect_report_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    DeltaCoverageError::Io(std::io::Error::other(format!(
                        "Failed to walk {}: {e}",
                        path.display()
                    )))
                })?;
                let is_report = entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext == REPORT_EXTENSION);
                if is_report {
                    files.push(entry.into_path());
                }
            }
        } else {
            return Err(DeltaCoverageError::Config(format!(
                "Coverage report not found: {}",
                path.display()
            )));
        }
    }
    Ok(files)
}

/// Load and merge every coverage report under the given paths.
///
/// # Errors
/// Returns an error if any report is missing, unreadable or malformed.
pub fn load_coverage(paths: &[PathBuf]) -> Result<CoverageData> {
    let files = collect_report_files(paths)?;
    if files.is_empty() {
        tracing::warn!("no coverage reports found");
    }

    let loaded: Vec<CoverageData> = files
        .par_iter()
        .map(|file| load_report(file))
        .collect::<Result<_>>()?;

    let mut data = CoverageData::new();
    for report in loaded {
        data.merge(report);
    }
    tracing::info!(
        reports = files.len(),
        classes = data.len(),
        "coverage data loaded"
    );
    Ok(data)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
