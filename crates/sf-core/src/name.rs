//! Schema-qualified object names.
//!
//! Every schema object is addressed by a [`SchemaQualifiedName`]: a schema
//! name plus a pre-escaped object name. The fully-qualified escaped form
//! (`"schema"."object"`) is the canonical map key throughout the planner and
//! the form used for DDL emission.

use crate::ident::{quote_ident, unquote_ident};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A schema name paired with a pre-escaped object name.
///
/// The object name is stored already double-quoted so that snapshots carry
/// exactly the identifier text that will appear in emitted DDL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaQualifiedName {
    /// Unescaped schema name, e.g. `public`
    pub schema_name: String,
    /// Escaped object name, e.g. `"users"`
    pub escaped_name: String,
}

impl SchemaQualifiedName {
    /// Build a name from unescaped parts, escaping the object name.
    pub fn new(schema: impl Into<String>, object: &str) -> Self {
        Self {
            schema_name: schema.into(),
            escaped_name: quote_ident(object),
        }
    }

    /// The canonical fully-qualified escaped form, e.g. `"public"."users"`.
    pub fn fq_escaped_name(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema_name), self.escaped_name)
    }

    /// The unescaped object name, e.g. `users`.
    pub fn object_name(&self) -> String {
        unquote_ident(&self.escaped_name)
    }
}

impl fmt::Display for SchemaQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fq_escaped_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_escaped_name() {
        let name = SchemaQualifiedName::new("reporting", "sales_summary");
        assert_eq!(name.fq_escaped_name(), r#""reporting"."sales_summary""#);
        assert_eq!(name.to_string(), r#""reporting"."sales_summary""#);
    }

    #[test]
    fn test_object_name_unescapes() {
        let name = SchemaQualifiedName::new("public", r#"odd"name"#);
        assert_eq!(name.escaped_name, r#""odd""name""#);
        assert_eq!(name.object_name(), r#"odd"name"#);
    }

    #[test]
    fn test_ordering_is_by_schema_then_name() {
        let a = SchemaQualifiedName::new("public", "a");
        let b = SchemaQualifiedName::new("public", "b");
        let c = SchemaQualifiedName::new("reporting", "a");
        assert!(a < b);
        assert!(b < c);
    }
}
