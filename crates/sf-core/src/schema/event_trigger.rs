//! Event trigger value type.

use super::SchemaObject;
use crate::ident::quote_ident;
use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// An event trigger. Event triggers are database-global, so the name is
/// unqualified. The trigger function is an implicit dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTrigger {
    /// Unescaped trigger name (event triggers live outside any schema)
    pub name: String,
    /// Firing event, e.g. `ddl_command_end`, `sql_drop`
    pub event: String,
    /// Command tags filtering the trigger; empty means fire for every tag.
    /// Tag order is preserved from the source definition.
    pub tags: Vec<String>,
    pub enabled: bool,
    /// Qualified name of the trigger function
    pub function: SchemaQualifiedName,
}

impl EventTrigger {
    pub fn normalize(self) -> Self {
        self
    }

    /// The escaped bare name used in DDL and as the vertex identity.
    pub fn escaped_name(&self) -> String {
        quote_ident(&self.name)
    }
}

impl SchemaObject for EventTrigger {
    fn stable_id(&self) -> String {
        self.escaped_name()
    }
}
