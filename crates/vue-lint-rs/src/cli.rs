//! Command-line argument parsing.

use crate::config::RuleLevel;
use clap::Parser;
use std::path::PathBuf;

/// Vue template linter - directive-aware checks for single-file components
#[derive(Parser, Debug, Clone)]
#[command(name = "vue-lint-rs")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files or directories to lint (defaults to the workspace)
    pub paths: Vec<PathBuf>,

    /// Workspace directory
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Path to vuelint.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Apply automatic fixes and write them back
    #[arg(long)]
    pub fix: bool,

    /// Run in watch mode
    #[arg(long)]
    pub watch: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Fail when more warnings than this are reported
    #[arg(long)]
    pub max_warnings: Option<usize>,

    /// Override a rule level, e.g. `--rule require-v-for-key=warn`
    #[arg(long = "rule", value_name = "ID=LEVEL", value_parser = parse_rule_override)]
    pub rules: Vec<(String, RuleLevel)>,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Show timing information
    #[arg(long)]
    pub timings: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long)]
    pub preserve_watch_output: bool,
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// One JSON object per line
    Json,
    /// Colon-separated, one diagnostic per line
    Machine,
}

/// Parse `id=level`.
fn parse_rule_override(value: &str) -> Result<(String, RuleLevel), String> {
    let (id, level) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=LEVEL, got `{value}`"))?;
    let level = level.trim().parse::<RuleLevel>()?;
    Ok((id.trim().to_string(), level))
}
