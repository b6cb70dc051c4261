//! Relation and column-reference extraction from parsed SQL.
//!
//! Uses the sqlparser visitor API to walk statements for the `ObjectName`s
//! appearing in FROM clauses, JOINs, and subqueries, filtering out names
//! bound by WITH clauses. Unquoted identifiers fold to lowercase the way
//! PostgreSQL resolves them.

use sf_core::schema::TableColumnRef;
use sf_core::SchemaQualifiedName;
use sqlparser::ast::{visit_expressions, visit_relations, Expr, Ident, ObjectName, Query, Statement};
use std::collections::BTreeSet;
use std::ops::ControlFlow;

/// A possibly schema-qualified object reference, before resolution against a
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectRef {
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectRef {
    pub fn new(schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }

    /// Parse a dotted, possibly-quoted identifier chain such as
    /// `public."my table"` or `log_ddl`.
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = raw.trim();
        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('"') {
                // quoted part: find the closing quote, honoring "" escapes
                let mut value = String::new();
                let mut chars = stripped.chars().peekable();
                let mut consumed = 1;
                while let Some(c) = chars.next() {
                    consumed += c.len_utf8();
                    if c == '"' {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            consumed += 1;
                            value.push('"');
                        } else {
                            break;
                        }
                    } else {
                        value.push(c);
                    }
                }
                parts.push(value);
                rest = &rest[consumed..];
            } else {
                let end = rest.find('.').unwrap_or(rest.len());
                parts.push(rest[..end].to_lowercase());
                rest = &rest[end..];
            }
            rest = rest.strip_prefix('.').unwrap_or(rest);
        }

        if parts.is_empty() {
            return Self::new(None, raw.trim().to_lowercase());
        }
        let name = parts.pop().unwrap_or_default();
        let schema = parts.pop();
        Self { schema, name }
    }

    /// Resolve to a qualified name, defaulting the schema.
    pub fn qualify(&self, default_schema: &str) -> SchemaQualifiedName {
        SchemaQualifiedName::new(
            self.schema.as_deref().unwrap_or(default_schema),
            &self.name,
        )
    }
}

/// The value of an identifier as PostgreSQL resolves it: quoted identifiers
/// keep their exact text, unquoted ones fold to lowercase.
pub(crate) fn ident_value(ident: &Ident) -> String {
    if ident.quote_style.is_some() {
        ident.value.clone()
    } else {
        ident.value.to_lowercase()
    }
}

/// Collapse an `ObjectName` to `(schema, name)`, keeping the last two parts.
pub(crate) fn object_ref(name: &ObjectName) -> ObjectRef {
    let parts: Vec<String> = name.0.iter().map(ident_value).collect();
    match parts.as_slice() {
        [] => ObjectRef::new(None, String::new()),
        [name] => ObjectRef::new(None, name.clone()),
        [.., schema, name] => ObjectRef::new(Some(schema.clone()), name.clone()),
    }
}

/// All relation names a query references, minus its own CTEs.
pub fn relations_in_query(query: &Query) -> BTreeSet<ObjectRef> {
    let cte_names = cte_names_of_query(query);
    collect_relations(query, &cte_names)
}

/// All relation names a statement references, minus CTEs.
pub fn relations_in_statement(statement: &Statement) -> BTreeSet<ObjectRef> {
    let cte_names = match statement {
        Statement::Query(query) => cte_names_of_query(query),
        _ => BTreeSet::new(),
    };
    collect_relations(statement, &cte_names)
}

fn collect_relations<V: sqlparser::ast::Visit>(
    node: &V,
    cte_names: &BTreeSet<String>,
) -> BTreeSet<ObjectRef> {
    let mut refs = BTreeSet::new();
    let _ = visit_relations(node, |relation: &ObjectName| {
        refs.insert(object_ref(relation));
        ControlFlow::<()>::Continue(())
    });
    refs.retain(|r| r.schema.is_some() || !cte_names.contains(&r.name));
    refs
}

fn cte_names_of_query(query: &Query) -> BTreeSet<String> {
    query
        .with
        .iter()
        .flat_map(|with| with.cte_tables.iter())
        .map(|cte| ident_value(&cte.alias.name))
        .collect()
}

/// Best-effort `(table, column)` pairs from compound identifiers.
///
/// `a.b` yields `(a, b)`; longer chains keep the last two parts. The table
/// part may really be an alias or a schema; the planner treats the result as
/// advisory.
pub fn column_refs_in_statement(statement: &Statement) -> BTreeSet<TableColumnRef> {
    let mut refs = BTreeSet::new();
    let _ = visit_expressions(statement, |expr: &Expr| {
        if let Expr::CompoundIdentifier(parts) = expr {
            if parts.len() >= 2 {
                let column = ident_value(&parts[parts.len() - 1]);
                let table = ident_value(&parts[parts.len() - 2]);
                refs.insert(TableColumnRef { table, column });
            }
        }
        ControlFlow::<()>::Continue(())
    });
    refs
}

#[cfg(test)]
#[path = "relations_test.rs"]
mod tests;
