//! Diff command implementation
//!
//! Show the per-kind add/delete/alter buckets between two DDL files.

use anyhow::Result;
use serde::Serialize;

use crate::cli::{DiffArgs, GlobalArgs, OutputFormat};
use crate::commands::{load_config, load_snapshot};
use sf_core::schema::SchemaObject;
use sf_core::{KindDiff, SchemaDiff};

/// Per-kind summary for JSON output
#[derive(Debug, Serialize)]
struct KindSummary {
    kind: &'static str,
    added: Vec<String>,
    deleted: Vec<String>,
    altered: Vec<String>,
}

impl KindSummary {
    fn new<T: SchemaObject>(kind: &'static str, diff: &KindDiff<T>) -> Self {
        Self {
            kind,
            added: diff.adds.iter().map(|o| o.stable_id()).collect(),
            deleted: diff.deletes.iter().map(|o| o.stable_id()).collect(),
            altered: diff.alters.iter().map(|p| p.new.stable_id()).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.altered.is_empty()
    }
}

/// Execute the diff command
pub fn execute(args: &DiffArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let old = load_snapshot(&args.snapshots.old, "old", global)?.normalize();
    let new = load_snapshot(&args.snapshots.new, "new", global)?.normalize();

    let diff = SchemaDiff::between(&old, &new);
    let summaries = vec![
        KindSummary::new("table", &diff.tables),
        KindSummary::new("view", &diff.views),
        KindSummary::new("function", &diff.functions),
        KindSummary::new("procedure", &diff.procedures),
        KindSummary::new("event trigger", &diff.event_triggers),
    ];

    match config.output_format(args.snapshots.format) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Text => print_text(&summaries),
    }

    Ok(())
}

fn print_text(summaries: &[KindSummary]) {
    if summaries.iter().all(KindSummary::is_empty) {
        println!("Schemas are identical.");
        return;
    }

    for summary in summaries {
        if summary.is_empty() {
            continue;
        }
        println!(
            "{}: {} added, {} deleted, {} altered",
            summary.kind,
            summary.added.len(),
            summary.deleted.len(),
            summary.altered.len()
        );
        for name in &summary.added {
            println!("  + {}", name);
        }
        for name in &summary.deleted {
            println!("  - {}", name);
        }
        for name in &summary.altered {
            println!("  ~ {}", name);
        }
    }
}
