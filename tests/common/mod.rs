#![allow(dead_code)]

use std::fmt::Write;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the delta-coverage binary.
#[macro_export]
macro_rules! delta_coverage {
    () => {{
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("delta-coverage"));
        cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
        cmd
    }};
}

pub const COVERED_SOURCE: &str = "src/main/java/com/example/CoveredClass.java";
pub const UNCOVERED_SOURCE: &str = "src/main/java/com/example/excludes/UncoveredClass.java";
pub const DEEP_SOURCE: &str = "src/main/java/com/example/excludes/sub/deep/Other.java";

/// Coverage of the sample project: `CoveredClass` is fully covered, everything else is not.
pub const SAMPLE_COVERAGE: &str = r#"{
  "classes": [
    {
      "name": "com/example/CoveredClass",
      "source_file": "CoveredClass.java",
      "covered_lines": [3, 4],
      "instructions": [{"line": 3, "covered": 2}, {"line": 4, "covered": 3}]
    },
    {
      "name": "com/example/CoveredClass$UncoveredNestedClass",
      "source_file": "CoveredClass.java",
      "missed_lines": [8, 9],
      "instructions": [{"line": 8, "missed": 2}, {"line": 9, "missed": 1}]
    },
    {
      "name": "com/example/excludes/UncoveredClass",
      "source_file": "UncoveredClass.java",
      "missed_lines": [2],
      "instructions": [{"line": 2, "missed": 4}]
    },
    {
      "name": "com/example/excludes/sub/deep/Other",
      "source_file": "Other.java",
      "missed_lines": [1]
    }
  ]
}"#;

pub const SAMPLE_EXCLUSIONS: [&str; 3] = [
    "**/CoveredClass$UncoveredNestedClass.*",
    "**/excludes/**/UncoveredClass.*",
    "**/excludes/sub/**/*.*",
];

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Diff, coverage report and no config: the sample project after a change.
    pub fn sample() -> Self {
        let fixture = Self::new();
        let mut diff = String::new();
        append_added_lines(&mut diff, COVERED_SOURCE, 3, 8);
        append_added_lines(&mut diff, UNCOVERED_SOURCE, 1, 5);
        append_added_lines(&mut diff, DEEP_SOURCE, 1, 3);
        fixture.create_file("changes.diff", &diff);
        fixture.create_file("build/coverage/report.json", SAMPLE_COVERAGE);
        fixture
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn create_config(&self, content: &str) {
        self.create_file(".delta-coverage.toml", content);
    }

    pub fn read(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }
}

/// Appends a diff section adding `count` lines starting at `start` to `path`.
pub fn append_added_lines(diff: &mut String, path: &str, start: u32, count: u32) {
    let _ = writeln!(diff, "diff --git a/{path} b/{path}");
    let _ = writeln!(diff, "--- a/{path}");
    let _ = writeln!(diff, "+++ b/{path}");
    let _ = writeln!(diff, "@@ -{},0 +{start},{count} @@", start - 1);
    for i in 0..count {
        let _ = writeln!(diff, "+    line {};", start + i);
    }
}
