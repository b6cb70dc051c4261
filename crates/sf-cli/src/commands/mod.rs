//! Command implementations

pub mod diff;
pub mod plan;

use crate::cli::GlobalArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use sf_core::Schema;
use std::path::Path;

/// Load the config file if one was given, defaults otherwise.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

/// Read a DDL file and build its snapshot.
pub fn load_snapshot(path: &Path, label: &str, global: &GlobalArgs) -> Result<Schema> {
    let ddl = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} schema file {}", label, path.display()))?;
    let schema = sf_sql::snapshot_from_ddl(&ddl)
        .with_context(|| format!("Failed to parse {} schema file {}", label, path.display()))?;

    if global.verbose {
        eprintln!(
            "[verbose] {} snapshot: {} tables, {} views, {} functions, {} procedures, {} event triggers",
            label,
            schema.tables.len(),
            schema.views.len(),
            schema.functions.len(),
            schema.procedures.len(),
            schema.event_triggers.len(),
        );
    }

    Ok(schema)
}
