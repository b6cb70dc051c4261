//! Table, column, and constraint value types.

use super::SchemaObject;
use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// One table column. Column order is structural: reordering columns is a
/// table change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unescaped column name
    pub name: String,
    /// Rendered SQL type, e.g. `INT`, `NUMERIC(10,2)`
    pub data_type: String,
    pub nullable: bool,
    /// Rendered default expression, if any
    pub default: Option<String>,
}

/// A CHECK constraint. Unnamed constraints keep `name = None`; they can be
/// added but not dropped by the table generator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub name: Option<String>,
    pub expression: String,
}

/// A relation with ordered columns, an optional primary key, and CHECK
/// constraints. Tables declare no dependencies of their own; they are the
/// anchors that view and function edges point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: SchemaQualifiedName,
    pub columns: Vec<Column>,
    /// Primary-key column names, in key order
    pub primary_key: Vec<String>,
    pub check_constraints: Vec<CheckConstraint>,
}

impl Table {
    /// Normalize for comparison: check constraints are an unordered set, so
    /// sort them. Columns and primary-key order are meaningful and kept.
    pub fn normalize(mut self) -> Self {
        self.check_constraints.sort();
        self.check_constraints.dedup();
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

impl SchemaObject for Table {
    fn stable_id(&self) -> String {
        self.name.fq_escaped_name()
    }
}
