//! Compact constructors for building snapshots in tests.
//!
//! All helpers default to the `public` schema and nullable columns; tests
//! that need more mutate the returned value's public fields.

use super::{Column, EventTrigger, Function, Procedure, Table, View};
use crate::name::SchemaQualifiedName;

/// A `public`-schema qualified name.
pub fn qualified(object: &str) -> SchemaQualifiedName {
    SchemaQualifiedName::new("public", object)
}

/// A table with nullable columns given as `(name, type)` pairs.
pub fn table(name: &str, columns: &[(&str, &str)]) -> Table {
    Table {
        name: qualified(name),
        columns: columns
            .iter()
            .map(|(col_name, data_type)| Column {
                name: col_name.to_string(),
                data_type: data_type.to_string(),
                nullable: true,
                default: None,
            })
            .collect(),
        primary_key: vec![],
        check_constraints: vec![],
    }
}

/// A view with explicit dependency lists (bare `public` object names).
pub fn view(name: &str, definition: &str, dep_tables: &[&str], dep_views: &[&str]) -> View {
    View {
        name: qualified(name),
        definition: definition.to_string(),
        depends_on_tables: dep_tables.iter().map(|t| qualified(t)).collect(),
        depends_on_views: dep_views.iter().map(|v| qualified(v)).collect(),
    }
}

/// A function with no extracted dependencies.
pub fn function(name: &str, definition: &str, language: &str) -> Function {
    Function {
        name: qualified(name),
        definition: definition.to_string(),
        language: language.to_string(),
        args_signature: String::new(),
        depends_on_functions: vec![],
        depends_on_tables: vec![],
        referenced_columns: vec![],
    }
}

pub fn procedure(name: &str, definition: &str) -> Procedure {
    Procedure {
        name: qualified(name),
        definition: definition.to_string(),
    }
}

/// An enabled event trigger whose function lives in `public`.
pub fn event_trigger(name: &str, event: &str, tags: &[&str], function: &str) -> EventTrigger {
    EventTrigger {
        name: name.to_string(),
        event: event.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        enabled: true,
        function: qualified(function),
    }
}
