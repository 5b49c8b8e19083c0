//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Playlog - load song catalogs and listening logs into a DuckDB star schema
#[derive(Parser, Debug)]
#[command(name = "pl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (info-level logs unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the warehouse database path (":memory:" allowed)
    #[arg(short, long, global = true, env = "PLAYLOG_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load catalog files, then event logs, into the warehouse
    Load(LoadArgs),

    /// Drop and recreate every warehouse table
    Reset(ResetArgs),

    /// Show row counts per warehouse table
    Counts(CountsArgs),
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Load a single dataset instead of both
    #[arg(long, value_enum)]
    pub only: Option<DatasetArg>,

    /// Roll back and skip failing files instead of stopping (overrides on_error)
    #[arg(long)]
    pub continue_on_error: bool,

    /// Suppress per-file progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Dataset selector for `load --only`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetArg {
    /// Song/artist catalog files
    Songs,
    /// Listening event logs
    Logs,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm dropping all loaded data
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the counts command
#[derive(Args, Debug)]
pub struct CountsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: CountsOutput,
}

/// Counts output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountsOutput {
    /// Aligned table
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
