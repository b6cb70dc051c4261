//! View value type.

use super::{normalize_dependency_list, SchemaObject};
use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// A view: a name, its `SELECT` definition text, and the tables and views the
/// definition references. Dependency lists refer only to objects in the same
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: SchemaQualifiedName,
    /// The `SELECT …` text emitted after `CREATE VIEW <name> AS `
    pub definition: String,
    pub depends_on_tables: Vec<SchemaQualifiedName>,
    pub depends_on_views: Vec<SchemaQualifiedName>,
}

impl View {
    pub fn normalize(mut self) -> Self {
        self.depends_on_tables = normalize_dependency_list(self.depends_on_tables);
        self.depends_on_views = normalize_dependency_list(self.depends_on_views);
        self
    }
}

impl SchemaObject for View {
    fn stable_id(&self) -> String {
        self.name.fq_escaped_name()
    }
}
