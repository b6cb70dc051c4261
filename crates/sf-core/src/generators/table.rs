//! Table vertex generator.
//!
//! Tables alter in place: column adds/drops/changes, primary-key swaps, and
//! named CHECK constraints each become their own `ALTER TABLE` statement.
//! Tables declare no dependencies; their vertices anchor the edges that view
//! and function generators emit.

use super::{statement, table_vertex_id, VertexGenerator};
use crate::error::PlanResult;
use crate::graph::{DiffKind, Edge, VertexId};
use crate::ident::quote_ident;
use crate::plan::PlanOptions;
use crate::schema::{CheckConstraint, Column, Table};
use crate::statement::{HazardKind, MigrationHazard, Statement};

pub(crate) struct TableGenerator {
    options: PlanOptions,
}

impl TableGenerator {
    pub(crate) fn new(options: &PlanOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    fn statement(&self, ddl: String) -> Statement {
        statement(&self.options, ddl, vec![])
    }

    fn statement_with(&self, ddl: String, hazard: MigrationHazard) -> Statement {
        statement(&self.options, ddl, vec![hazard])
    }
}

fn render_column(column: &Column) -> String {
    let mut rendered = format!("{} {}", quote_ident(&column.name), column.data_type);
    if !column.nullable {
        rendered.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        rendered.push_str(&format!(" DEFAULT {}", default));
    }
    rendered
}

fn render_check(check: &CheckConstraint) -> String {
    match &check.name {
        Some(name) => format!("CONSTRAINT {} CHECK ({})", quote_ident(name), check.expression),
        None => format!("CHECK ({})", check.expression),
    }
}

fn quoted_column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The default name PostgreSQL gives a table's primary-key constraint.
fn pkey_constraint_name(table: &Table) -> String {
    quote_ident(&format!("{}_pkey", table.name.object_name()))
}

impl VertexGenerator for TableGenerator {
    type Object = Table;

    fn add(&self, table: &Table) -> PlanResult<Vec<Statement>> {
        let mut items: Vec<String> = table.columns.iter().map(render_column).collect();
        if !table.primary_key.is_empty() {
            items.push(format!("PRIMARY KEY ({})", quoted_column_list(&table.primary_key)));
        }
        items.extend(table.check_constraints.iter().map(render_check));

        let ddl = format!(
            "CREATE TABLE {} (\n    {}\n)",
            table.name.fq_escaped_name(),
            items.join(",\n    ")
        );
        Ok(vec![self.statement(ddl)])
    }

    fn delete(&self, table: &Table) -> PlanResult<Vec<Statement>> {
        let ddl = format!("DROP TABLE {}", table.name.fq_escaped_name());
        Ok(vec![self.statement_with(
            ddl,
            MigrationHazard::deletes_data("Deletes the table and all its rows"),
        )])
    }

    fn alter(&self, old: &Table, new: &Table) -> PlanResult<Vec<Statement>> {
        if old == new {
            return Ok(vec![]);
        }

        let fq = new.name.fq_escaped_name();
        let mut statements = Vec::new();

        // removed named checks first so column drops they reference succeed
        for check in &old.check_constraints {
            if !new.check_constraints.contains(check) {
                if let Some(name) = &check.name {
                    statements.push(self.statement(format!(
                        "ALTER TABLE {} DROP CONSTRAINT {}",
                        fq,
                        quote_ident(name)
                    )));
                }
            }
        }

        // column changes are grouped by category, not by column: all drops,
        // then all adds, then type changes, then nullability, then defaults
        let common: Vec<(&Column, &Column)> = new
            .columns
            .iter()
            .filter_map(|column| old.column(&column.name).map(|old_column| (old_column, column)))
            .collect();

        for column in &old.columns {
            if !new.has_column(&column.name) {
                statements.push(self.statement_with(
                    format!("ALTER TABLE {} DROP COLUMN {}", fq, quote_ident(&column.name)),
                    MigrationHazard::deletes_data("Deletes all values in the column"),
                ));
            }
        }

        for column in &new.columns {
            if !old.has_column(&column.name) {
                statements.push(self.statement(format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    fq,
                    render_column(column)
                )));
            }
        }

        for &(old_column, new_column) in &common {
            statements.extend(self.alter_column_type(&fq, old_column, new_column));
        }
        for &(old_column, new_column) in &common {
            statements.extend(self.alter_column_nullability(&fq, old_column, new_column));
        }
        for &(old_column, new_column) in &common {
            statements.extend(self.alter_column_default(&fq, old_column, new_column));
        }

        if old.primary_key != new.primary_key {
            if !old.primary_key.is_empty() {
                statements.push(self.statement(format!(
                    "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
                    fq,
                    pkey_constraint_name(old)
                )));
            }
            if !new.primary_key.is_empty() {
                statements.push(self.statement_with(
                    format!(
                        "ALTER TABLE {} ADD PRIMARY KEY ({})",
                        fq,
                        quoted_column_list(&new.primary_key)
                    ),
                    MigrationHazard::new(
                        HazardKind::AcquiresAccessExclusiveLock,
                        "Building the primary-key index locks the table",
                    ),
                ));
            }
        }

        for check in &new.check_constraints {
            if !old.check_constraints.contains(check) {
                statements.push(self.statement(format!("ALTER TABLE {} ADD {}", fq, render_check(check))));
            }
        }

        Ok(statements)
    }

    fn vertex_id(&self, table: &Table, diff_kind: DiffKind) -> VertexId {
        table_vertex_id(&table.name, diff_kind)
    }

    fn add_alter_deps(&self, _new: &Table, _old: Option<&Table>) -> PlanResult<Vec<Edge>> {
        Ok(vec![])
    }

    fn delete_deps(&self, _table: &Table) -> PlanResult<Vec<Edge>> {
        Ok(vec![])
    }
}

impl TableGenerator {
    fn alter_column_type(&self, fq: &str, old: &Column, new: &Column) -> Option<Statement> {
        if old.data_type == new.data_type {
            return None;
        }
        Some(self.statement_with(
            format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
                fq,
                quote_ident(&new.name),
                new.data_type
            ),
            MigrationHazard::new(
                HazardKind::AcquiresAccessExclusiveLock,
                "Changing a column type may rewrite the table under an exclusive lock",
            ),
        ))
    }

    fn alter_column_nullability(&self, fq: &str, old: &Column, new: &Column) -> Option<Statement> {
        if old.nullable == new.nullable {
            return None;
        }
        let clause = if new.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
        Some(self.statement(format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            fq,
            quote_ident(&new.name),
            clause
        )))
    }

    fn alter_column_default(&self, fq: &str, old: &Column, new: &Column) -> Option<Statement> {
        if old.default == new.default {
            return None;
        }
        let col = quote_ident(&new.name);
        let ddl = match &new.default {
            Some(default) => format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
                fq, col, default
            ),
            None => format!("ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT", fq, col),
        };
        Some(self.statement(ddl))
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
