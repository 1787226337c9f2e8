use std::fs;

use crate::{DeltaCoverageError, EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result};

#[must_use]
pub fn run_init(args: &crate::cli::InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Initializes a new configuration file.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &crate::cli::InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(DeltaCoverageError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub fn generate_config_template() -> String {
    r#"# delta-coverage configuration file

# Classes to leave out of delta coverage (glob syntax).
# Patterns match the compiled class path, e.g. com/example/Outer$Inner.class.
# `*` does not cross `/`; use `**` for any number of packages.
exclude_classes = [
    # "**/generated/**",
    # "**/*$Builder.*",
]

# Where the diff comes from. Set exactly one.
[diff]
git = "origin/main"
# file = "build/changes.diff"
# url = "https://example.com/pull/1.diff"

[coverage]
# Coverage report files, or directories searched for *.json reports.
reports = ["build/coverage"]

[violations]
# Shorthand: require this ratio for lines, branches and instructions.
fail_if_coverage_less_than = 0.8

# Fail the build when a rule is violated
# (defaults to true when fail_if_coverage_less_than is set).
# fail_on_violations = true

# Per-entity rules replace the shorthand for that entity.
# [[violations.rules]]
# entity = "branch"
# min_coverage_ratio = 0.5
# # Skip the rule when fewer branches than this were changed.
# entity_count_threshold = 10

[report]
# Output format: text, json or markdown
format = "text"
# output = "build/reports/delta-coverage.txt"
"#
    .to_string()
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
