//! Function value type and best-effort column references.

use super::{normalize_dependency_list, SchemaObject};
use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// The one language whose function bodies are amenable to dependency
/// extraction. Bodies in any other language get a
/// `HasUntrackableDependencies` hazard instead.
pub const TRACKABLE_LANGUAGE: &str = "sql";

/// A best-effort `(table, column)` reference extracted from a function body.
///
/// The extractor does not fully parse the body, so the table part may be an
/// alias or a schema name; references that match no tracked table simply
/// produce no ordering edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableColumnRef {
    pub table: String,
    pub column: String,
}

/// A function: the full `CREATE OR REPLACE FUNCTION` text plus the
/// dependencies extracted from it. `CREATE OR REPLACE` is also the alter
/// mechanism, so the definition text is emitted verbatim for both adds and
/// alters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: SchemaQualifiedName,
    /// Full `CREATE OR REPLACE FUNCTION …` statement text
    pub definition: String,
    /// Language tag in lowercase, e.g. `sql`, `plpgsql`
    pub language: String,
    /// Rendered parameter list, e.g. `a integer, b integer`
    pub args_signature: String,
    pub depends_on_functions: Vec<SchemaQualifiedName>,
    pub depends_on_tables: Vec<SchemaQualifiedName>,
    pub referenced_columns: Vec<TableColumnRef>,
}

impl Function {
    pub fn normalize(mut self) -> Self {
        self.depends_on_functions = normalize_dependency_list(self.depends_on_functions);
        self.depends_on_tables = normalize_dependency_list(self.depends_on_tables);
        self.referenced_columns.sort();
        self.referenced_columns.dedup();
        self
    }

    /// Whether body dependencies of this function can be tracked.
    pub fn dependencies_trackable(&self) -> bool {
        self.language == TRACKABLE_LANGUAGE
    }
}

impl SchemaObject for Function {
    fn stable_id(&self) -> String {
        self.name.fq_escaped_name()
    }
}
