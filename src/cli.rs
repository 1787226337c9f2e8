use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "delta-coverage")]
#[command(author, version, about = "Check test coverage of changed lines only")]
#[command(long_about = "Restricts coverage reports to the lines added by a diff and \
    checks the result against minimum coverage ratios.\n\n\
    Exit codes:\n  \
    0 - No violations, or violations are not configured to fail\n  \
    1 - Coverage violations found\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check coverage of changed lines
    Check(CheckArgs),

    /// Generate a default configuration file
    Init(InitArgs),

    /// Configuration file utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CheckArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read the unified diff from a file
    #[arg(long, conflicts_with_all = ["diff_git", "diff_url"])]
    pub diff_file: Option<PathBuf>,

    /// Diff the working tree against a git reference (branch, tag or commit)
    #[arg(long, conflicts_with = "diff_url")]
    pub diff_git: Option<String>,

    /// Download the unified diff from an http(s) URL
    #[arg(long)]
    pub diff_url: Option<String>,

    /// Coverage report file or directory (can be specified multiple times)
    #[arg(long = "coverage")]
    pub coverage: Vec<PathBuf>,

    /// Class exclusion patterns (glob syntax, can be specified multiple times)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Fail if line, branch or instruction coverage is below this ratio (0.0-1.0)
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Report violations without failing
    #[arg(long)]
    pub no_fail: bool,

    /// Output format [possible values: text, json, markdown]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = ".delta-coverage.toml")]
    pub output: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Output format for `config show`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate configuration file syntax and values
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = ".delta-coverage.toml")]
        config: PathBuf,
    },

    /// Display the effective configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ConfigOutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
