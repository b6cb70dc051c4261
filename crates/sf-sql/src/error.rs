//! Error types for sf-sql

use thiserror::Error;

/// DDL parsing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// S001: sqlparser rejected a statement we must understand
    #[error("[S001] Failed to parse statement `{statement}`: {message}")]
    ParseError { statement: String, message: String },

    /// S002: A statement was recognized but is structurally unusable
    #[error("[S002] Invalid {kind} definition `{statement}`: {message}")]
    InvalidDefinition {
        kind: &'static str,
        statement: String,
        message: String,
    },
}

impl SqlError {
    /// Build a parse error, truncating the offending statement for display.
    pub(crate) fn parse(statement: &str, message: impl Into<String>) -> Self {
        Self::ParseError {
            statement: truncate(statement),
            message: message.into(),
        }
    }

    pub(crate) fn invalid(
        kind: &'static str,
        statement: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidDefinition {
            kind,
            statement: truncate(statement),
            message: message.into(),
        }
    }
}

fn truncate(statement: &str) -> String {
    const MAX: usize = 120;
    let flat = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX {
        let head: String = flat.chars().take(MAX).collect();
        format!("{head}…")
    } else {
        flat
    }
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
