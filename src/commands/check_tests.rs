use std::fmt::Write;
use std::fs;

use tempfile::TempDir;

use super::*;
use crate::checker::ViolationResult;

const COVERAGE_REPORT: &str = r#"{
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
    }
  ]
}"#;

fn added_file(diff: &mut String, path: &str, start: u32, count: u32) {
    writeln!(diff, "diff --git a/{path} b/{path}").unwrap();
    writeln!(diff, "--- a/{path}").unwrap();
    writeln!(diff, "+++ b/{path}").unwrap();
    writeln!(diff, "@@ -{},0 +{start},{count} @@", start - 1).unwrap();
    for i in 0..count {
        writeln!(diff, "+line {}", start + i).unwrap();
    }
}

fn setup() -> (TempDir, Config) {
    let temp = TempDir::new().unwrap();
    let mut diff = String::new();
    added_file(&mut diff, "src/main/java/com/example/CoveredClass.java", 3, 8);
    added_file(
        &mut diff,
        "src/main/java/com/example/excludes/UncoveredClass.java",
        1,
        5,
    );
    fs::write(temp.path().join("changes.diff"), diff).unwrap();
    fs::create_dir_all(temp.path().join("build/coverage")).unwrap();
    fs::write(
        temp.path().join("build/coverage/report.json"),
        COVERAGE_REPORT,
    )
    .unwrap();

    let mut config = Config::default();
    config.diff.file = Some(PathBuf::from("changes.diff"));
    config.coverage.reports = vec![PathBuf::from("build/coverage")];
    config.violations.fail_if_coverage_less_than = Some(1.0);
    (temp, config)
}

#[test]
fn excluded_uncovered_classes_pass() {
    let (temp, mut config) = setup();
    config.exclude_classes = vec![
        "**/CoveredClass$UncoveredNestedClass.*".to_string(),
        "**/excludes/**/UncoveredClass.*".to_string(),
        "**/excludes/sub/**/*.*".to_string(),
    ];

    let report = run_delta_coverage(&config, temp.path()).unwrap();

    assert_eq!(report.result.violation_count, 0);
    assert_eq!(report.classes.len(), 1);
    assert_eq!(report.classes[0].class_name, "com/example/CoveredClass");
    assert_eq!(determine_exit_code(&report), EXIT_SUCCESS);
}

#[test]
fn uncovered_classes_fail() {
    let (temp, config) = setup();

    let report = run_delta_coverage(&config, temp.path()).unwrap();

    assert_eq!(
        report.result.message,
        "Fail on violations: true. Found violations: 2"
    );
    assert_eq!(determine_exit_code(&report), EXIT_VIOLATIONS_FOUND);
}

#[test]
fn missing_diff_source_is_config_error() {
    let (temp, mut config) = setup();
    config.diff = DiffConfig::default();

    let err = run_delta_coverage(&config, temp.path()).unwrap_err();
    assert!(matches!(err, DeltaCoverageError::Config(_)));
}

#[test]
fn missing_coverage_reports_is_config_error() {
    let (temp, mut config) = setup();
    config.coverage.reports.clear();

    let err = run_delta_coverage(&config, temp.path()).unwrap_err();
    assert!(err.to_string().contains("No coverage reports"));
}

#[test]
fn threshold_above_one_is_config_error() {
    let (temp, mut config) = setup();
    config.violations.fail_if_coverage_less_than = Some(1.5);

    let err = run_delta_coverage(&config, temp.path()).unwrap_err();
    assert!(matches!(err, DeltaCoverageError::Config(_)));
}

#[test]
fn cli_overrides_replace_diff_and_reports() {
    let mut config = Config::default();
    config.diff.git = Some("origin/main".to_string());
    config.coverage.reports = vec![PathBuf::from("old")];
    config.exclude_classes = vec!["**/A.*".to_string()];
    let args = CheckArgs {
        diff_file: Some(PathBuf::from("new.diff")),
        coverage: vec![PathBuf::from("new")],
        exclude: vec!["**/B.*".to_string()],
        min_coverage: Some(0.5),
        no_fail: true,
        format: Some(OutputFormat::Json),
        output: Some(PathBuf::from("out.json")),
        ..Default::default()
    };

    apply_cli_overrides(&mut config, &args);

    assert_eq!(config.diff.file, Some(PathBuf::from("new.diff")));
    assert!(config.diff.git.is_none());
    assert_eq!(config.coverage.reports, vec![PathBuf::from("new")]);
    assert_eq!(config.exclude_classes, vec!["**/A.*", "**/B.*"]);
    assert_eq!(config.violations.fail_if_coverage_less_than, Some(0.5));
    assert_eq!(config.violations.fail_on_violations, Some(false));
    assert_eq!(config.report.format, OutputFormat::Json);
    assert_eq!(config.report.output, Some(PathBuf::from("out.json")));
}

#[test]
fn cli_overrides_keep_config_when_absent() {
    let mut config = Config::default();
    config.diff.git = Some("origin/main".to_string());
    let before = config.clone();

    apply_cli_overrides(&mut config, &CheckArgs::default());

    assert_eq!(config, before);
}

#[test]
fn no_fail_turns_violations_into_success() {
    let (temp, mut config) = setup();
    config.violations.fail_on_violations = Some(false);

    let report = run_delta_coverage(&config, temp.path()).unwrap();

    assert_eq!(report.result.violation_count, 2);
    assert_eq!(determine_exit_code(&report), EXIT_SUCCESS);
}

#[test]
fn exit_code_follows_result() {
    let (temp, config) = setup();
    let mut report = run_delta_coverage(&config, temp.path()).unwrap();
    report.result = ViolationResult::new(true, Vec::new());
    assert_eq!(determine_exit_code(&report), EXIT_SUCCESS);
}
