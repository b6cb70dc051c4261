//! Plan assembly: diff the snapshots, run every generator, schedule.

use crate::diff::SchemaDiff;
use crate::error::PlanResult;
use crate::generators::{
    collect_kind, EventTriggerGenerator, FunctionGenerator, ProcedureGenerator, TableGenerator,
    ViewGenerator,
};
use crate::graph::PlanGraph;
use crate::plan::{Plan, PlanOptions};
use crate::schema::Schema;
use crate::statement::MigrationHazard;

/// Compute the ordered migration plan that turns `old` into `new`.
///
/// Planning is purely functional: the snapshots are not mutated, there is no
/// I/O, and equal inputs produce byte-identical plans. Errors are structured
/// and never yield a partial plan.
pub fn generate_plan(old: &Schema, new: &Schema, options: &PlanOptions) -> PlanResult<Plan> {
    // Snapshots arrive normalized; normalizing again is idempotent and keeps
    // alter detection honest for callers that hand-build schemas.
    let old = old.clone().normalize();
    let new = new.clone().normalize();

    let diff = SchemaDiff::between(&old, &new);
    let mut graph = PlanGraph::new();

    let tables = TableGenerator::new(options);
    collect_kind(&mut graph, &diff.tables, &tables)?;

    let views = ViewGenerator::new(&new, options);
    collect_kind(&mut graph, &diff.views, &views)?;

    let functions = FunctionGenerator::new(&new, &diff.tables.alters, options);
    collect_kind(&mut graph, &diff.functions, &functions)?;

    let procedures = ProcedureGenerator::new(options);
    collect_kind(&mut graph, &diff.procedures, &procedures)?;

    let event_triggers = EventTriggerGenerator::new(&new, options);
    collect_kind(&mut graph, &diff.event_triggers, &event_triggers)?;

    let order = graph.topological_sort()?;

    let mut statements = Vec::new();
    for vertex in &order {
        if let Some(vertex_statements) = graph.statements_for(vertex) {
            statements.extend_from_slice(vertex_statements);
        }
    }

    let mut hazards: Vec<MigrationHazard> = statements
        .iter()
        .flat_map(|s| s.hazards.iter().cloned())
        .collect();
    hazards.sort();
    hazards.dedup();

    Ok(Plan {
        statements,
        hazards,
    })
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
