//! View vertex generator.
//!
//! Views cannot be altered in place: an alter drops the old view and creates
//! the new one from the same `AddAlter` vertex. A view must exist after every
//! relation it reads, and must be torn down (or rebuilt) before any relation
//! it used to read is torn down.

use super::{statement, table_vertex_id, view_vertex_id, VertexGenerator};
use crate::error::PlanResult;
use crate::generators::generator_failure;
use crate::graph::{DiffKind, Edge, ObjectKind, VertexId};
use crate::plan::PlanOptions;
use crate::schema::{Schema, View};
use crate::statement::{MigrationHazard, Statement};
use std::collections::BTreeSet;

pub(crate) struct ViewGenerator {
    tables_in_new: BTreeSet<String>,
    views_in_new: BTreeSet<String>,
    options: PlanOptions,
}

impl ViewGenerator {
    pub(crate) fn new(new_schema: &Schema, options: &PlanOptions) -> Self {
        Self {
            tables_in_new: new_schema
                .tables
                .iter()
                .map(|t| t.name.fq_escaped_name())
                .collect(),
            views_in_new: new_schema
                .views
                .iter()
                .map(|v| v.name.fq_escaped_name())
                .collect(),
            options: options.clone(),
        }
    }
}

impl VertexGenerator for ViewGenerator {
    type Object = View;

    fn add(&self, view: &View) -> PlanResult<Vec<Statement>> {
        if view.definition.trim().is_empty() {
            return Err(generator_failure(
                ObjectKind::View,
                view.name.fq_escaped_name(),
                "view has an empty definition",
            ));
        }
        let ddl = format!(
            "CREATE VIEW {} AS {}",
            view.name.fq_escaped_name(),
            view.definition
        );
        Ok(vec![statement(&self.options, ddl, vec![])])
    }

    fn delete(&self, view: &View) -> PlanResult<Vec<Statement>> {
        let ddl = format!("DROP VIEW {}", view.name.fq_escaped_name());
        Ok(vec![statement(
            &self.options,
            ddl,
            vec![MigrationHazard::deletes_data("Deletes the view")],
        )])
    }

    fn alter(&self, old: &View, new: &View) -> PlanResult<Vec<Statement>> {
        if old == new {
            return Ok(vec![]);
        }
        // Views cannot be altered directly, they must be dropped and recreated
        let mut statements = self.delete(old)?;
        statements.extend(self.add(new)?);
        Ok(statements)
    }

    fn vertex_id(&self, view: &View, diff_kind: DiffKind) -> VertexId {
        view_vertex_id(&view.name, diff_kind)
    }

    fn add_alter_deps(&self, new: &View, old: Option<&View>) -> PlanResult<Vec<Edge>> {
        let me = view_vertex_id(&new.name, DiffKind::AddAlter);
        let mut deps = Vec::new();

        for table in &new.depends_on_tables {
            deps.push(me.runs_after(table_vertex_id(table, DiffKind::AddAlter)));
        }
        for view in &new.depends_on_views {
            if view != &new.name {
                deps.push(me.runs_after(view_vertex_id(view, DiffKind::AddAlter)));
            }
        }

        // A rebuilt view must stop referencing an old dependency before that
        // dependency is torn down.
        if let Some(old) = old {
            for table in &old.depends_on_tables {
                if !new.depends_on_tables.contains(table)
                    && !self.tables_in_new.contains(&table.fq_escaped_name())
                {
                    deps.push(me.runs_before(table_vertex_id(table, DiffKind::Delete)));
                }
            }
            for view in &old.depends_on_views {
                if view != &old.name
                    && !new.depends_on_views.contains(view)
                    && !self.views_in_new.contains(&view.fq_escaped_name())
                {
                    deps.push(me.runs_before(view_vertex_id(view, DiffKind::Delete)));
                }
            }
        }

        Ok(deps)
    }

    fn delete_deps(&self, view: &View) -> PlanResult<Vec<Edge>> {
        let me = view_vertex_id(&view.name, DiffKind::Delete);
        let mut deps = Vec::new();

        for table in &view.depends_on_tables {
            if !self.tables_in_new.contains(&table.fq_escaped_name()) {
                deps.push(me.runs_before(table_vertex_id(table, DiffKind::Delete)));
            }
        }
        for dep_view in &view.depends_on_views {
            if dep_view != &view.name && !self.views_in_new.contains(&dep_view.fq_escaped_name()) {
                deps.push(me.runs_before(view_vertex_id(dep_view, DiffKind::Delete)));
            }
        }

        Ok(deps)
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
