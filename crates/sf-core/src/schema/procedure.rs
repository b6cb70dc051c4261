//! Procedure value type.

use super::SchemaObject;
use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// A stored procedure. Dependencies are untracked beyond the name; the
/// definition text is opaque to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: SchemaQualifiedName,
    /// Full `CREATE PROCEDURE …` statement text
    pub definition: String,
}

impl Procedure {
    pub fn normalize(self) -> Self {
        self
    }
}

impl SchemaObject for Procedure {
    fn stable_id(&self) -> String {
        self.name.fq_escaped_name()
    }
}
