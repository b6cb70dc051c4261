//! SQL identifier quoting utilities
//!
//! Provides safe quoting for SQL identifiers and string literals when
//! constructing DDL statements.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double
/// quotes by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sf_core::ident::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Undo [`quote_ident`]: strip surrounding double quotes and collapse doubled
/// quotes. Input that is not quoted is returned unchanged.
pub fn unquote_ident(ident: &str) -> String {
    if ident.len() >= 2 && ident.starts_with('"') && ident.ends_with('"') {
        ident[1..ident.len() - 1].replace("\"\"", "\"")
    } else {
        ident.to_string()
    }
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_string_literal(value: &str) -> String {
    value.replace('\'', "''")
}
