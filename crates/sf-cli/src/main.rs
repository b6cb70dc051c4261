//! Schemaflow CLI - ordered PostgreSQL schema migration planning

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;

use cli::Cli;
use commands::{diff, plan};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Plan(args) => plan::execute(args, &cli.global),
        cli::Commands::Diff(args) => diff::execute(args, &cli.global),
    }
}
