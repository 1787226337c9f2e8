use std::fmt::Write;
use std::fs;
use std::path::Path;

use crate::cli::{Cli, ConfigAction, ConfigOutputFormat};
use crate::config::{Config, invalid_exclusion_patterns, parse_config, validate_config_semantics};
use crate::{DeltaCoverageError, EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result};

use super::context::load_config;

#[must_use]
pub fn run_config(args: &crate::cli::ConfigArgs, cli: &Cli) -> i32 {
    match &args.action {
        ConfigAction::Validate { config } => run_config_validate(config),
        ConfigAction::Show { config, format } => {
            run_config_show(config.as_deref(), *format, cli.no_config)
        }
    }
}

fn run_config_validate(config_path: &Path) -> i32 {
    match run_config_validate_impl(config_path) {
        Ok(warnings) => {
            for warning in &warnings {
                eprintln!("Warning: {warning}");
            }
            println!("Configuration is valid: {}", config_path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.error_type());
            EXIT_CONFIG_ERROR
        }
    }
}

/// Validates a configuration file and returns non-fatal warnings.
///
/// # Errors
/// Returns an error if the file doesn't exist, contains invalid TOML, or has semantic errors.
pub(crate) fn run_config_validate_impl(config_path: &Path) -> Result<Vec<String>> {
    if !config_path.exists() {
        return Err(DeltaCoverageError::Config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(config_path)?;
    let config = parse_config(&content)?;
    validate_config_semantics(&config)?;

    Ok(invalid_exclusion_patterns(&config)
        .into_iter()
        .map(|pattern| format!("invalid exclusion pattern '{pattern}' will be ignored"))
        .collect())
}

fn run_config_show(config_path: Option<&Path>, format: ConfigOutputFormat, no_config: bool) -> i32 {
    match run_config_show_impl(config_path, format, no_config) {
        Ok(output) => {
            print!("{output}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Renders the effective configuration.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or serialized.
pub(crate) fn run_config_show_impl(
    config_path: Option<&Path>,
    format: ConfigOutputFormat,
    no_config: bool,
) -> Result<String> {
    let loaded = load_config(config_path, no_config)?;
    match format {
        ConfigOutputFormat::Json => {
            let mut output = serde_json::to_string_pretty(&loaded.config)?;
            output.push('\n');
            Ok(output)
        }
        ConfigOutputFormat::Text => {
            let source = loaded
                .source
                .as_ref()
                .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());
            format_config_text(&loaded.config, &source)
        }
    }
}

/// Render the configuration as annotated TOML.
///
/// # Errors
/// Returns an error if the configuration cannot be serialized.
pub fn format_config_text(config: &Config, source: &str) -> Result<String> {
    let mut output = String::new();
    writeln!(output, "# Effective configuration (source: {source})").ok();
    output.push_str(&toml::to_string_pretty(config)?);
    Ok(output)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
