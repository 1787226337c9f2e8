//! Integration tests for the `config` and `init` commands.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn init_creates_default_config_file() {
    let fixture = TestFixture::new();

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = fixture.read(".delta-coverage.toml");
    assert!(content.contains("fail_if_coverage_less_than"));
    assert!(content.contains("exclude_classes"));
}

#[test]
fn init_fails_if_config_exists() {
    let fixture = TestFixture::new();
    fixture.create_config("# existing config\n");

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn generated_config_validates() {
    let fixture = TestFixture::new();

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn validate_rejects_duplicate_rules() {
    let fixture = TestFixture::new();
    fixture.create_config(
        r#"
[[violations.rules]]
entity = "line"
min_coverage_ratio = 0.5

[[violations.rules]]
entity = "line"
min_coverage_ratio = 0.7
"#,
    );

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["config", "validate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate"));
}

#[test]
fn validate_warns_on_invalid_pattern() {
    let fixture = TestFixture::new();
    fixture.create_config("exclude_classes = [\"[oops\"]\n");

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: invalid exclusion pattern"));
}

#[test]
fn show_prints_effective_config() {
    let fixture = TestFixture::new();
    fixture.create_config("[diff]\ngit = \"origin/main\"\n");

    delta_coverage!()
        .current_dir(fixture.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"git\": \"origin/main\""));
}
