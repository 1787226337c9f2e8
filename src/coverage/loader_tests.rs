use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use super::*;

const FOO_REPORT: &str = r#"{
  "classes": [
    {
      "name": "com/example/Foo",
      "source_file": "Foo.java",
      "covered_lines": [3, 4],
      "missed_lines": [5],
      "instructions": [{"line": 3, "covered": 2}, {"line": 5, "missed": 4}],
      "branches": [{"line": 4, "covered": 1, "missed": 1}]
    }
  ]
}"#;

const FOO_SECOND_RUN: &str = r#"{
  "classes": [
    { "name": "com/example/Foo", "source_file": "Foo.java", "covered_lines": [5] },
    { "name": "com/example/Bar", "source_file": "Bar.java", "missed_lines": [1] }
  ]
}"#;

#[test]
fn parse_report_json() {
    let report = CoverageReport::from_json(FOO_REPORT).unwrap();
    assert_eq!(report.classes.len(), 1);

    let data = report.into_coverage_data();
    let foo = data.get("com/example/Foo").unwrap();
    assert_eq!(foo.class.path().unwrap(), "com/example/Foo.java");
    assert_eq!(foo.counters.covered_lines, BTreeSet::from([3, 4]));
    assert_eq!(foo.counters.instructions[&5], LineCounter::new(0, 4));
    assert_eq!(foo.counters.branch_counter(), LineCounter::new(1, 1));
}

#[test]
fn parse_empty_report() {
    let report = CoverageReport::from_json("{}").unwrap();
    assert!(report.into_coverage_data().is_empty());
}

#[test]
fn parse_invalid_report_fails() {
    assert!(CoverageReport::from_json("{\"classes\": 3}").is_err());
}

#[test]
fn load_report_reports_path_on_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();

    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, DeltaCoverageError::CoverageReport { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn load_report_missing_file() {
    let err = load_report(Path::new("/definitely/missing/coverage.json")).unwrap_err();
    assert!(matches!(err, DeltaCoverageError::FileRead { .. }));
}

#[test]
fn collect_walks_directories_for_json() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("a.json"), FOO_REPORT).unwrap();
    fs::write(dir.path().join("nested/b.json"), FOO_SECOND_RUN).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let files = collect_report_files(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.extension().unwrap() == "json"));
}

#[test]
fn collect_missing_path_is_error() {
    let result = collect_report_files(&[PathBuf::from("/definitely/missing")]);
    assert!(matches!(result, Err(DeltaCoverageError::Config(_))));
}

#[test]
fn load_coverage_merges_reports() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&first, FOO_REPORT).unwrap();
    fs::write(&second, FOO_SECOND_RUN).unwrap();

    let data = load_coverage(&[first, second]).unwrap();

    assert_eq!(data.len(), 2);
    let foo = data.get("com/example/Foo").unwrap();
    assert_eq!(foo.counters.covered_lines, BTreeSet::from([3, 4, 5]));
    assert!(foo.counters.missed_lines.is_empty());
}
