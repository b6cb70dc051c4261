//! Plan command implementation
//!
//! Compute and print the ordered migration plan between two DDL files.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::{load_config, load_snapshot};
use sf_core::{generate_plan, Plan, Statement};

/// Plan report for JSON output
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    timestamp: DateTime<Utc>,
    old_file: String,
    new_file: String,
    fingerprint: String,
    statements: &'a [Statement],
    hazards: Vec<String>,
}

/// Execute the plan command
pub fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let options = config.plan_options(args.statement_timeout_ms, args.lock_timeout_ms);

    let old = load_snapshot(&args.snapshots.old, "old", global)?;
    let new = load_snapshot(&args.snapshots.new, "new", global)?;

    let plan = generate_plan(&old, &new, &options)?;

    if global.verbose {
        eprintln!(
            "[verbose] plan: {} statements, {} hazards, fingerprint {}",
            plan.statements.len(),
            plan.hazards.len(),
            plan.fingerprint()
        );
    }

    match config.output_format(args.snapshots.format) {
        OutputFormat::Json => print_json(args, &plan)?,
        OutputFormat::Text => print_text(&plan),
    }

    Ok(())
}

fn print_json(args: &PlanArgs, plan: &Plan) -> Result<()> {
    let report = PlanReport {
        timestamp: Utc::now(),
        old_file: args.snapshots.old.display().to_string(),
        new_file: args.snapshots.new.display().to_string(),
        fingerprint: plan.fingerprint(),
        statements: &plan.statements,
        hazards: plan.hazards.iter().map(|h| h.to_string()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(plan: &Plan) {
    if plan.statements.is_empty() {
        println!("Schemas are identical. Nothing to do.");
        return;
    }

    for (index, statement) in plan.statements.iter().enumerate() {
        println!("{:>3}. {};", index + 1, statement.ddl);
    }

    if !plan.hazards.is_empty() {
        eprintln!();
        for hazard in &plan.hazards {
            eprintln!("WARNING {}", hazard);
        }
    }
}
