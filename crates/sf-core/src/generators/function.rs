//! Function vertex generator.
//!
//! `CREATE OR REPLACE FUNCTION` is both the create and the alter mechanism,
//! so a function never contributes both an `AddAlter` and a `Delete` vertex
//! in one plan, and an alter never emits a preceding drop. Bodies in any
//! language other than `sql` carry a `HasUntrackableDependencies` hazard
//! because their dependencies cannot be ordered.

use super::{function_vertex_id, statement, table_vertex_id, VertexGenerator};
use crate::diff::ObjectDiff;
use crate::error::PlanResult;
use crate::generators::generator_failure;
use crate::graph::{DiffKind, Edge, ObjectKind, VertexId};
use crate::plan::PlanOptions;
use crate::schema::{Function, Schema, Table};
use crate::statement::{HazardKind, MigrationHazard, Statement};
use std::collections::BTreeSet;

const UNTRACKABLE_ADD_MESSAGE: &str =
    "Dependencies, i.e. other functions used in the function body, of non-sql functions cannot \
     be tracked, so their ordering relative to this statement is not guaranteed. Ensure that all \
     functions this function depends on are created or altered before this statement.";

const UNTRACKABLE_DELETE_MESSAGE: &str =
    "Dependencies, i.e. other functions used in the function body, of non-sql functions cannot \
     be tracked, so their ordering relative to this statement is not guaranteed. Ensure that all \
     functions this function depends on are dropped after this statement.";

pub(crate) struct FunctionGenerator<'a> {
    functions_in_new: BTreeSet<String>,
    /// Table alters of the same migration, consulted so a function that
    /// references a freshly added column installs after that column exists.
    table_alters: &'a [ObjectDiff<Table>],
    options: PlanOptions,
}

impl<'a> FunctionGenerator<'a> {
    pub(crate) fn new(
        new_schema: &Schema,
        table_alters: &'a [ObjectDiff<Table>],
        options: &PlanOptions,
    ) -> Self {
        Self {
            functions_in_new: new_schema
                .functions
                .iter()
                .map(|f| f.name.fq_escaped_name())
                .collect(),
            table_alters,
            options: options.clone(),
        }
    }

    fn untrackable_hazard(function: &Function, message: &str) -> Vec<MigrationHazard> {
        if function.dependencies_trackable() {
            vec![]
        } else {
            vec![MigrationHazard::new(
                HazardKind::HasUntrackableDependencies,
                message,
            )]
        }
    }
}

/// Whether a column reference's table part names this table.
///
/// References are extracted best-effort, so the table part may be bare,
/// qualified, or an alias that matches nothing.
fn table_matches(table: &Table, referenced: &str) -> bool {
    table.name.object_name() == referenced || table.name.fq_escaped_name() == referenced
}

impl VertexGenerator for FunctionGenerator<'_> {
    type Object = Function;

    fn add(&self, function: &Function) -> PlanResult<Vec<Statement>> {
        if function.definition.trim().is_empty() {
            return Err(generator_failure(
                ObjectKind::Function,
                function.name.fq_escaped_name(),
                "function has an empty definition",
            ));
        }
        Ok(vec![statement(
            &self.options,
            function.definition.clone(),
            Self::untrackable_hazard(function, UNTRACKABLE_ADD_MESSAGE),
        )])
    }

    fn delete(&self, function: &Function) -> PlanResult<Vec<Statement>> {
        let ddl = format!("DROP FUNCTION {}", function.name.fq_escaped_name());
        Ok(vec![statement(
            &self.options,
            ddl,
            Self::untrackable_hazard(function, UNTRACKABLE_DELETE_MESSAGE),
        )])
    }

    fn alter(&self, old: &Function, new: &Function) -> PlanResult<Vec<Statement>> {
        // Normalized snapshots mean dependency-list ordering cannot fake a
        // diff here; stored text equality is the contract.
        if old == new {
            return Ok(vec![]);
        }
        self.add(new)
    }

    fn vertex_id(&self, function: &Function, diff_kind: DiffKind) -> VertexId {
        function_vertex_id(&function.name, diff_kind)
    }

    fn add_alter_deps(&self, new: &Function, old: Option<&Function>) -> PlanResult<Vec<Edge>> {
        let me = function_vertex_id(&new.name, DiffKind::AddAlter);
        let mut deps = Vec::new();

        for function in &new.depends_on_functions {
            if function != &new.name {
                deps.push(me.runs_after(function_vertex_id(function, DiffKind::AddAlter)));
            }
        }
        for table in &new.depends_on_tables {
            deps.push(me.runs_after(table_vertex_id(table, DiffKind::AddAlter)));
        }

        // Columns the body references that are added by a table alter in this
        // migration must exist before the function is installed.
        for column_ref in &new.referenced_columns {
            for table_diff in self.table_alters {
                let names_match = table_matches(&table_diff.new, &column_ref.table)
                    || table_matches(&table_diff.old, &column_ref.table);
                if names_match && !table_diff.old.has_column(&column_ref.column) {
                    deps.push(
                        me.runs_after(table_vertex_id(&table_diff.new.name, DiffKind::AddAlter)),
                    );
                }
            }
        }

        // An altered function must stop referencing a dropped function before
        // the drop runs. Since `CREATE OR REPLACE` is the alter mechanism, a
        // function being added or altered never has its own Delete vertex.
        if let Some(old) = old {
            for function in &old.depends_on_functions {
                if !self.functions_in_new.contains(&function.fq_escaped_name()) {
                    deps.push(me.runs_before(function_vertex_id(function, DiffKind::Delete)));
                }
            }
        }

        Ok(deps)
    }

    fn delete_deps(&self, function: &Function) -> PlanResult<Vec<Edge>> {
        let me = function_vertex_id(&function.name, DiffKind::Delete);
        let mut deps = Vec::new();
        for dep in &function.depends_on_functions {
            if dep != &function.name && !self.functions_in_new.contains(&dep.fq_escaped_name()) {
                deps.push(me.runs_before(function_vertex_id(dep, DiffKind::Delete)));
            }
        }
        Ok(deps)
    }
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
