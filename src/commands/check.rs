use std::path::{Path, PathBuf};

use crate::checker::{DeltaReport, ViolationEvaluator};
use crate::cli::{CheckArgs, Cli};
use crate::config::{Config, DiffConfig, DiffOrigin, validate_config_semantics};
use crate::coverage::load_coverage;
use crate::exclude::ClassExclusionFilter;
use crate::output::{
    JsonFormatter, MarkdownFormatter, OutputFormat, OutputFormatter, TextFormatter,
};
use crate::{DeltaCoverageError, EXIT_CONFIG_ERROR, EXIT_SUCCESS, EXIT_VIOLATIONS_FOUND};

use super::context::{color_choice_to_mode, load_config, write_output};

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

pub(crate) fn run_check_impl(args: &CheckArgs, cli: &Cli) -> crate::Result<i32> {
    // 1. Load configuration
    let mut config = load_config(args.config.as_deref(), cli.no_config)?.config;

    // 2. Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // 3. Evaluate relative to the working directory
    let workdir = std::env::current_dir()?;
    let report = run_delta_coverage(&config, &workdir)?;

    // 4. Render
    let formatter: Box<dyn OutputFormatter> = match config.report.format {
        OutputFormat::Text => Box::new(TextFormatter::with_verbose(
            color_choice_to_mode(cli.color),
            cli.verbose,
        )),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
    };
    let output = formatter.format(&report)?;
    let output_path = config.report.output.as_ref().map(|path| workdir.join(path));
    write_output(output_path.as_deref(), &output, cli.quiet)?;
    if output_path.is_some() && !cli.quiet {
        println!("{}", report.result.message);
    }

    Ok(determine_exit_code(&report))
}

/// Run the whole pipeline for a resolved configuration.
///
/// Relative diff and report paths are resolved against `workdir`.
///
/// # Errors
/// Returns an error if the configuration is invalid, no diff source or coverage
/// report is configured, or any input cannot be read.
pub fn run_delta_coverage(config: &Config, workdir: &Path) -> crate::Result<DeltaReport> {
    validate_config_semantics(config)?;
    let rules = config.violations.to_rules()?;

    let origin = config.diff.origin()?.ok_or_else(|| {
        DeltaCoverageError::Config(
            "No diff source configured. Use --diff-file, --diff-git or --diff-url.".to_string(),
        )
    })?;
    let origin = match origin {
        DiffOrigin::File(path) => DiffOrigin::File(workdir.join(path)),
        other => other,
    };
    let diff = origin.into_source(workdir)?.load_index()?;

    if config.coverage.reports.is_empty() {
        return Err(DeltaCoverageError::Config(
            "No coverage reports configured. Use --coverage or [coverage] reports.".to_string(),
        ));
    }
    let reports: Vec<PathBuf> = config
        .coverage
        .reports
        .iter()
        .map(|path| workdir.join(path))
        .collect();
    let coverage = load_coverage(&reports)?;

    let exclusions = ClassExclusionFilter::new(&config.exclude_classes);
    let evaluator = ViolationEvaluator::new(diff, exclusions, rules);
    evaluator.analyze(&coverage.into_classes())
}

pub(crate) fn apply_cli_overrides(config: &mut Config, args: &CheckArgs) {
    if args.diff_file.is_some() || args.diff_git.is_some() || args.diff_url.is_some() {
        config.diff = DiffConfig {
            file: args.diff_file.clone(),
            git: args.diff_git.clone(),
            url: args.diff_url.clone(),
        };
    }

    if !args.coverage.is_empty() {
        config.coverage.reports.clone_from(&args.coverage);
    }

    config.exclude_classes.extend(args.exclude.iter().cloned());

    if let Some(ratio) = args.min_coverage {
        config.violations.fail_if_coverage_less_than = Some(ratio);
    }

    if args.no_fail {
        config.violations.fail_on_violations = Some(false);
    }

    if let Some(format) = args.format {
        config.report.format = format;
    }

    if let Some(output) = &args.output {
        config.report.output = Some(output.clone());
    }
}

pub(crate) const fn determine_exit_code(report: &DeltaReport) -> i32 {
    if report.result.is_failed() {
        EXIT_VIOLATIONS_FOUND
    } else {
        EXIT_SUCCESS
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
