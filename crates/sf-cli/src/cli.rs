//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schemaflow - ordered PostgreSQL schema migration planning
#[derive(Parser, Debug)]
#[command(name = "sf")]
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
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a schemaflow.yml config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the ordered migration plan between two DDL files
    Plan(PlanArgs),

    /// Show the per-kind object diff between two DDL files
    Diff(DiffArgs),
}

/// Arguments shared by plan and diff: the two schema snapshots
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// DDL file describing the current (old) schema
    #[arg(long)]
    pub old: PathBuf,

    /// DDL file describing the desired (new) schema
    #[arg(long)]
    pub new: PathBuf,

    /// Output format (defaults to the config file's `output`, then text)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub snapshots: SnapshotArgs,

    /// Per-statement timeout in milliseconds (overrides config)
    #[arg(long)]
    pub statement_timeout_ms: Option<u64>,

    /// Per-statement lock timeout in milliseconds (overrides config)
    #[arg(long)]
    pub lock_timeout_ms: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    #[command(flatten)]
    pub snapshots: SnapshotArgs,
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}
