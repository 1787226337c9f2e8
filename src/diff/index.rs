use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::path_utils::{path_ends_with, to_forward_slashes};
use crate::{DeltaCoverageError, Result};

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("Invalid regex")
});

/// Added line numbers (new-file numbering) per file of a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffIndex {
    files: BTreeMap<String, BTreeSet<u32>>,
}

/// Target of the file section currently being parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Unknown,
    Deleted,
    File(String),
}

/// An open hunk. Added lines are staged until the hunk is complete so an
/// inconsistent hunk can be dropped as a whole.
#[derive(Debug)]
struct OpenHunk {
    header_line: usize,
    old_remaining: u32,
    new_remaining: u32,
    next_line: u32,
    added: Vec<u32>,
}

impl OpenHunk {
    const fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    /// Consume one body line. Returns `false` if the line does not fit the hunk.
    fn accept(&mut self, line: &str) -> bool {
        match line.as_bytes().first() {
            Some(b'+') if self.new_remaining > 0 => {
                self.added.push(self.next_line);
                self.next_line = self.next_line.saturating_add(1);
                self.new_remaining -= 1;
                true
            }
            Some(b'-') if self.old_remaining > 0 => {
                self.old_remaining -= 1;
                true
            }
            // Context; some tools strip the single space of empty context lines.
            Some(b' ') | None if self.old_remaining > 0 && self.new_remaining > 0 => {
                self.next_line = self.next_line.saturating_add(1);
                self.old_remaining -= 1;
                self.new_remaining -= 1;
                true
            }
            Some(b'\\') => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
struct Parser {
    files: BTreeMap<String, BTreeSet<u32>>,
    target: Target,
    hunk: Option<OpenHunk>,
    recognized: bool,
}

impl Parser {
    const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            target: Target::Unknown,
            hunk: None,
            recognized: false,
        }
    }

    fn close_hunk(&mut self) {
        let Some(hunk) = self.hunk.take() else {
            return;
        };
        if !hunk.is_complete() {
            tracing::warn!(
                line = hunk.header_line,
                "skipping hunk with inconsistent line counts"
            );
            return;
        }
        if let Target::File(path) = &self.target
            && !hunk.added.is_empty()
        {
            self.files
                .entry(path.clone())
                .or_default()
                .extend(hunk.added);
        }
    }

    /// Feed one line; `ahead` holds the lines that follow it.
    fn feed(&mut self, line_no: usize, line: &str, ahead: &[&str]) {
        if self.hunk.as_ref().is_some_and(OpenHunk::is_complete) {
            self.close_hunk();
        }

        if let Some(hunk) = self.hunk.as_mut() {
            let starts_section = line.starts_with("diff --git ")
                || line.starts_with("@@")
                || starts_plain_file_header(line, ahead);
            if !starts_section && hunk.accept(line) {
                return;
            }
            self.close_hunk();
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            self.recognized = true;
            self.target = git_header_target(rest).map_or(Target::Unknown, Target::File);
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            self.recognized = true;
            self.target = parse_target_path(rest);
        } else if line.starts_with("@@") {
            self.recognized = true;
            self.open_hunk(line_no, line);
        }
    }

    fn open_hunk(&mut self, line_no: usize, line: &str) {
        let Some(caps) = HUNK_HEADER.captures(line) else {
            tracing::warn!(line = line_no, header = line, "skipping malformed hunk header");
            return;
        };
        let number = |idx: usize, default: u32| {
            caps.get(idx)
                .map_or(Some(default), |m| m.as_str().parse::<u32>().ok())
        };
        let (Some(old_count), Some(new_start), Some(new_count)) =
            (number(2, 1), number(3, 0), number(4, 1))
        else {
            tracing::warn!(line = line_no, header = line, "skipping hunk with invalid numbers");
            return;
        };

        if new_start.checked_add(new_count).is_none() {
            tracing::warn!(
                line = line_no,
                header = line,
                "skipping hunk beyond the last line number"
            );
            return;
        }
        if self.target == Target::Unknown {
            tracing::warn!(line = line_no, "skipping hunk without a file header");
            return;
        }
        if new_start == 0 && new_count > 0 {
            tracing::warn!(line = line_no, "skipping hunk starting at line 0");
            return;
        }

        self.hunk = Some(OpenHunk {
            header_line: line_no,
            old_remaining: old_count,
            new_remaining: new_count,
            next_line: new_start,
            added: Vec::new(),
        });
    }
}

/// A `--- ` line directly followed by `+++ ` and a hunk header opens the next
/// file of a plain (non-git) unified diff.
fn starts_plain_file_header(line: &str, ahead: &[&str]) -> bool {
    line.starts_with("--- ")
        && ahead.first().is_some_and(|next| next.starts_with("+++ "))
        && ahead.get(1).is_some_and(|next| next.starts_with("@@"))
}

/// Extract the `b/` side of a `diff --git a/x b/y` header.
fn git_header_target(rest: &str) -> Option<String> {
    let idx = rest.rfind(" b/")?;
    Some(normalize_diff_path(&rest[idx + 3..]))
}

fn parse_target_path(rest: &str) -> Target {
    let raw = rest.split('\t').next().unwrap_or(rest).trim().trim_matches('"');
    if raw == "/dev/null" {
        return Target::Deleted;
    }
    let path = raw.strip_prefix("b/").unwrap_or(raw);
    if path.is_empty() {
        return Target::Unknown;
    }
    Target::File(normalize_diff_path(path))
}

fn normalize_diff_path(path: &str) -> String {
    let path = to_forward_slashes(path.trim().trim_matches('"'));
    path.strip_prefix("./").map_or_else(|| path.clone(), str::to_string)
}

impl DiffIndex {
    /// Parse unified diff text.
    ///
    /// Hunks whose bodies disagree with their header counts, hunks without a
    /// file header and malformed hunk headers are skipped with a warning.
    ///
    /// # Errors
    /// Returns `DiffParse` if non-blank text contains no file header or hunk at all.
    pub fn parse(diff: &str) -> Result<Self> {
        let mut parser = Parser::new();
        let mut first_content_line = None;

        let lines: Vec<&str> = diff.lines().collect();
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            if first_content_line.is_none() && !line.trim().is_empty() {
                first_content_line = Some(line_no);
            }
            parser.feed(line_no, line, &lines[idx + 1..]);
        }
        parser.close_hunk();

        if let Some(line) = first_content_line
            && !parser.recognized
        {
            return Err(DeltaCoverageError::DiffParse {
                line,
                message: "no file header or hunk found".to_string(),
            });
        }

        let index = Self {
            files: parser.files,
        };
        tracing::debug!(
            files = index.file_count(),
            lines = index.changed_line_count(),
            "parsed diff"
        );
        Ok(index)
    }

    /// Changed lines of the file at `path`.
    ///
    /// An exact path match wins. Otherwise the lines of every diff file whose
    /// trailing path components equal `path` are combined, so a
    /// package-relative `com/x/Foo.java` finds `src/main/java/com/x/Foo.java`.
    /// Unknown paths have no changed lines.
    #[must_use]
    pub fn changed_lines(&self, path: &str) -> BTreeSet<u32> {
        let normalized = normalize_diff_path(path);
        if let Some(lines) = self.files.get(&normalized) {
            return lines.clone();
        }
        self.files
            .iter()
            .filter(|(file, _)| path_ends_with(file, &normalized))
            .flat_map(|(_, lines)| lines.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn changed_line_count(&self) -> usize {
        self.files.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, BTreeSet<u32>)> for DiffIndex {
    fn from_iter<T: IntoIterator<Item = (P, BTreeSet<u32>)>>(iter: T) -> Self {
        let mut files: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
        for (path, lines) in iter {
            if lines.is_empty() {
                continue;
            }
            files
                .entry(normalize_diff_path(&path.into()))
                .or_default()
                .extend(lines);
        }
        Self { files }
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
