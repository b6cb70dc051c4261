//! Building normalized [`Schema`] snapshots from DDL scripts.
//!
//! Tables and views go through sqlparser; functions, procedures, and event
//! triggers are recognized with targeted scanners because their bodies are
//! opaque strings that must survive verbatim. Statements the builder does
//! not model (schemas, indexes, grants, DML) are skipped: a snapshot is the
//! set of objects the planner diffs, not a full replay of the script.

use crate::error::{SqlError, SqlResult};
use crate::functions::{column_refs_regex, parse_routine, Routine, RoutineKind};
use crate::relations::{self, ObjectRef};
use crate::split::{split_statements, strip_leading_trivia};
use regex::Regex;
use sf_core::schema::{
    CheckConstraint, Column, EventTrigger, Function, Procedure, Table, TableColumnRef, View,
};
use sf_core::{Schema, SchemaQualifiedName};
use sqlparser::ast::{ColumnOption, CreateTable, Statement, TableConstraint};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const DEFAULT_SCHEMA: &str = "public";

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^CREATE\s+(?:UNLOGGED\s+)?TABLE\b").unwrap());

static CREATE_VIEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^CREATE\s+(?:OR\s+REPLACE\s+)?VIEW\b").unwrap());

static CREATE_EVENT_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^CREATE\s+EVENT\s+TRIGGER\s+(\S+)\s+ON\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:WHEN\s+TAG\s+IN\s*\(([^)]*)\)\s*)?EXECUTE\s+(?:FUNCTION|PROCEDURE)\s+([^(\s]+)\s*\(\s*\)",
    )
    .unwrap()
});

static ALTER_EVENT_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^ALTER\s+EVENT\s+TRIGGER\s+(\S+)\s+(DISABLE|ENABLE)\b").unwrap()
});

static CREATE_FUNCTION_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^(\s*)CREATE\s+FUNCTION\b").unwrap());

/// Parse a DDL script into a normalized snapshot.
pub fn snapshot_from_ddl(sql: &str) -> SqlResult<Schema> {
    let mut builder = SnapshotBuilder::new();
    builder.ingest(sql)?;
    Ok(builder.build())
}

struct PendingView {
    name: SchemaQualifiedName,
    definition: String,
    relations: BTreeSet<ObjectRef>,
}

struct PendingFunction {
    name: SchemaQualifiedName,
    definition: String,
    language: String,
    args_signature: String,
    relations: BTreeSet<ObjectRef>,
    referenced_columns: Vec<TableColumnRef>,
    /// body text searched for calls to other snapshot functions
    body_text: Option<String>,
}

/// Accumulates objects statement by statement; `build` resolves dependency
/// lists against the finished object sets.
#[derive(Default)]
pub struct SnapshotBuilder {
    tables: Vec<Table>,
    views: Vec<PendingView>,
    functions: Vec<PendingFunction>,
    procedures: Vec<Procedure>,
    event_triggers: Vec<EventTrigger>,
    trigger_toggles: Vec<(String, bool)>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `sql` and ingest every statement.
    pub fn ingest(&mut self, sql: &str) -> SqlResult<()> {
        for statement in split_statements(sql) {
            self.ingest_statement(&statement)?;
        }
        Ok(())
    }

    fn ingest_statement(&mut self, statement: &str) -> SqlResult<()> {
        let head = strip_leading_trivia(statement);

        if CREATE_TABLE.is_match(head) {
            self.tables.push(parse_table(statement)?);
        } else if CREATE_VIEW.is_match(head) {
            self.views.push(parse_view(statement)?);
        } else if let Some(caps) = CREATE_EVENT_TRIGGER.captures(head) {
            self.event_triggers.push(parse_event_trigger(&caps));
        } else if let Some(caps) = ALTER_EVENT_TRIGGER.captures(head) {
            let name = ObjectRef::parse(&caps[1]).name;
            let enabled = caps[2].eq_ignore_ascii_case("enable");
            self.trigger_toggles.push((name, enabled));
        } else if let Some(routine) = parse_routine(head) {
            match routine.kind {
                RoutineKind::Function => self.functions.push(pending_function(head, routine)),
                RoutineKind::Procedure => self.procedures.push(Procedure {
                    name: routine.name.qualify(DEFAULT_SCHEMA),
                    definition: head.to_string(),
                }),
            }
        }
        // anything else (schemas, indexes, grants, DML) is not snapshot state

        Ok(())
    }

    /// Resolve dependency lists and produce the normalized snapshot.
    pub fn build(mut self) -> Schema {
        for (name, enabled) in &self.trigger_toggles {
            for trigger in &mut self.event_triggers {
                if &trigger.name == name {
                    trigger.enabled = *enabled;
                }
            }
        }

        let table_names: BTreeSet<String> = self
            .tables
            .iter()
            .map(|t| t.name.fq_escaped_name())
            .collect();
        let view_names: BTreeSet<String> = self
            .views
            .iter()
            .map(|v| v.name.fq_escaped_name())
            .collect();
        let function_index: Vec<(String, SchemaQualifiedName)> = self
            .functions
            .iter()
            .map(|f| (f.name.object_name(), f.name.clone()))
            .collect();

        let views = self
            .views
            .iter()
            .map(|pending| {
                let own = pending.name.fq_escaped_name();
                let mut depends_on_tables = Vec::new();
                let mut depends_on_views = Vec::new();
                for reference in &pending.relations {
                    let qualified = reference.qualify(DEFAULT_SCHEMA);
                    let fq = qualified.fq_escaped_name();
                    if view_names.contains(&fq) {
                        if fq != own {
                            depends_on_views.push(qualified);
                        }
                    } else if table_names.contains(&fq) {
                        depends_on_tables.push(qualified);
                    }
                    // references to objects outside the snapshot are dropped
                }
                View {
                    name: pending.name.clone(),
                    definition: pending.definition.clone(),
                    depends_on_tables,
                    depends_on_views,
                }
            })
            .collect();

        let functions = self
            .functions
            .iter()
            .map(|pending| {
                let depends_on_tables = pending
                    .relations
                    .iter()
                    .map(|r| r.qualify(DEFAULT_SCHEMA))
                    .filter(|q| table_names.contains(&q.fq_escaped_name()))
                    .collect();
                let depends_on_functions =
                    called_functions(pending, &function_index);
                Function {
                    name: pending.name.clone(),
                    definition: pending.definition.clone(),
                    language: pending.language.clone(),
                    args_signature: pending.args_signature.clone(),
                    depends_on_functions,
                    depends_on_tables,
                    referenced_columns: pending.referenced_columns.clone(),
                }
            })
            .collect();

        Schema {
            tables: self.tables,
            views,
            functions,
            procedures: self.procedures,
            event_triggers: self.event_triggers,
        }
        .normalize()
    }
}

/// Functions of the snapshot that `pending`'s body appears to call.
///
/// Only trackable (`sql`) bodies are searched; a match is the called name
/// followed by an opening parenthesis.
fn called_functions(
    pending: &PendingFunction,
    function_index: &[(String, SchemaQualifiedName)],
) -> Vec<SchemaQualifiedName> {
    if pending.language != "sql" {
        return vec![];
    }
    let Some(body) = &pending.body_text else {
        return vec![];
    };
    let own = pending.name.fq_escaped_name();

    let mut called = Vec::new();
    for (object_name, qualified) in function_index {
        if qualified.fq_escaped_name() == own {
            continue;
        }
        let pattern = format!(r"\b{}\s*\(", regex::escape(object_name));
        if Regex::new(&pattern).map(|re| re.is_match(body)).unwrap_or(false) {
            called.push(qualified.clone());
        }
    }
    called
}

fn parse_statement(sql: &str) -> SqlResult<Statement> {
    Parser::parse_sql(&PostgreSqlDialect {}, sql)
        .map_err(|e| SqlError::parse(sql, e.to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| SqlError::parse(sql, "empty statement"))
}

fn parse_table(sql: &str) -> SqlResult<Table> {
    let statement = parse_statement(sql)?;
    let Statement::CreateTable(create) = statement else {
        return Err(SqlError::invalid("table", sql, "not a CREATE TABLE"));
    };
    Ok(table_from_ast(&create))
}

fn table_from_ast(create: &CreateTable) -> Table {
    let name = relations::object_ref(&create.name).qualify(DEFAULT_SCHEMA);

    let mut primary_key: Vec<String> = Vec::new();
    let mut check_constraints: Vec<CheckConstraint> = Vec::new();

    let mut columns = Vec::new();
    for column_def in &create.columns {
        let column_name = relations::ident_value(&column_def.name);
        let mut column = Column {
            name: column_name.clone(),
            data_type: column_def.data_type.to_string(),
            nullable: true,
            default: None,
        };
        for option_def in &column_def.options {
            match &option_def.option {
                ColumnOption::NotNull => column.nullable = false,
                ColumnOption::Null => column.nullable = true,
                ColumnOption::Default(expr) => column.default = Some(expr.to_string()),
                ColumnOption::Unique { is_primary, .. } if *is_primary => {
                    column.nullable = false;
                    primary_key.push(column_name.clone());
                }
                ColumnOption::Check(expr) => check_constraints.push(CheckConstraint {
                    name: option_def.name.as_ref().map(relations::ident_value),
                    expression: expr.to_string(),
                }),
                _ => {}
            }
        }
        columns.push(column);
    }

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey { columns: pk, .. } => {
                primary_key = pk.iter().map(relations::ident_value).collect();
                for key_column in &primary_key {
                    if let Some(column) = columns.iter_mut().find(|c| &c.name == key_column) {
                        column.nullable = false;
                    }
                }
            }
            TableConstraint::Check { name, expr, .. } => check_constraints.push(CheckConstraint {
                name: name.as_ref().map(relations::ident_value),
                expression: expr.to_string(),
            }),
            _ => {}
        }
    }

    Table {
        name,
        columns,
        primary_key,
        check_constraints,
    }
}

fn parse_view(sql: &str) -> SqlResult<PendingView> {
    let statement = parse_statement(sql)?;
    let Statement::CreateView { name, query, .. } = statement else {
        return Err(SqlError::invalid("view", sql, "not a CREATE VIEW"));
    };
    Ok(PendingView {
        name: relations::object_ref(&name).qualify(DEFAULT_SCHEMA),
        definition: query.to_string(),
        relations: relations::relations_in_query(&query),
    })
}

fn parse_event_trigger(caps: &regex::Captures<'_>) -> EventTrigger {
    let tags = caps
        .get(3)
        .map(|list| parse_tag_list(list.as_str()))
        .unwrap_or_default();
    EventTrigger {
        name: ObjectRef::parse(&caps[1]).name,
        event: caps[2].to_lowercase(),
        tags,
        enabled: true,
        function: ObjectRef::parse(&caps[4]).qualify(DEFAULT_SCHEMA),
    }
}

/// Parse `'CREATE TABLE', 'ALTER TABLE'` into tag strings, undoing the
/// doubled-quote escape.
fn parse_tag_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            let tag = tag.strip_prefix('\'').unwrap_or(tag);
            let tag = tag.strip_suffix('\'').unwrap_or(tag);
            tag.replace("''", "'")
        })
        .collect()
}

fn pending_function(statement: &str, routine: Routine) -> PendingFunction {
    let language = routine.language.clone().unwrap_or_else(|| "sql".to_string());

    // stored text always carries OR REPLACE, which is what makes function
    // alters a plain re-emission
    let definition = if routine.or_replace {
        statement.to_string()
    } else {
        CREATE_FUNCTION_HEAD
            .replace(statement, "${1}CREATE OR REPLACE FUNCTION")
            .into_owned()
    };

    let body_text = routine
        .dollar_body
        .clone()
        .or_else(|| routine.return_expr.as_ref().map(|e| format!("SELECT {e}")));

    let mut relations_found = BTreeSet::new();
    let mut referenced_columns = Vec::new();

    if language == "sql" {
        if let Some(body) = &body_text {
            match Parser::parse_sql(&PostgreSqlDialect {}, body) {
                Ok(statements) => {
                    for parsed in &statements {
                        relations_found.extend(relations::relations_in_statement(parsed));
                        referenced_columns.extend(relations::column_refs_in_statement(parsed));
                    }
                }
                Err(_) => referenced_columns = column_refs_regex(body),
            }
        }
    } else if let Some(body) = &routine.dollar_body {
        referenced_columns = column_refs_regex(body);
    }

    referenced_columns.sort();
    referenced_columns.dedup();

    PendingFunction {
        name: routine.name.qualify(DEFAULT_SCHEMA),
        definition,
        language,
        args_signature: routine.args,
        relations: relations_found,
        referenced_columns,
        body_text,
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
