//! Best-effort scanning of `CREATE FUNCTION` / `CREATE PROCEDURE` text.
//!
//! Routine definitions are kept verbatim for re-emission, so this module
//! never rewrites them; it only reads the header (name, argument list,
//! language) and locates the body. Bodies are usually dollar-quoted strings;
//! SQL-standard `RETURN expr` bodies are recognized as a fallback. Column
//! references come from the parser when the body parses as plain SQL and
//! from a conservative regex otherwise, mirroring how limited this analysis
//! is by design.

use crate::relations::ObjectRef;
use regex::Regex;
use sf_core::schema::TableColumnRef;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoutineKind {
    Function,
    Procedure,
}

/// The pieces of a routine definition the snapshot builder needs.
#[derive(Debug, Clone)]
pub(crate) struct Routine {
    pub kind: RoutineKind,
    pub or_replace: bool,
    pub name: ObjectRef,
    /// Raw argument list text between the header parentheses
    pub args: String,
    /// Lowercased language tag; PostgreSQL defaults are not applied here
    pub language: Option<String>,
    /// Dollar-quoted body content, if the definition has one
    pub dollar_body: Option<String>,
    /// Expression text of a SQL-standard `RETURN expr` body
    pub return_expr: Option<String>,
}

static ROUTINE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*CREATE\s+(OR\s+REPLACE\s+)?(FUNCTION|PROCEDURE)\s+").unwrap()
});

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLANGUAGE\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

static DOLLAR_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*\$|\$\$").unwrap());

static RETURN_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bRETURN\s+(.+?);?\s*$").unwrap());

static COLUMN_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_$]*)\.([A-Za-z_][A-Za-z0-9_$]*)").unwrap()
});

/// Scan one statement as a routine definition. Returns `None` when the
/// statement is not a `CREATE [OR REPLACE] FUNCTION|PROCEDURE`.
pub(crate) fn parse_routine(sql: &str) -> Option<Routine> {
    let head = ROUTINE_HEAD.captures(sql)?;
    let or_replace = head.get(1).is_some();
    let kind = if head[2].eq_ignore_ascii_case("function") {
        RoutineKind::Function
    } else {
        RoutineKind::Procedure
    };

    let after_head = &sql[head.get(0)?.end()..];
    let (raw_name, after_name) = read_name(after_head)?;
    let name = ObjectRef::parse(&raw_name);

    let open = after_name.find('(')?;
    let args_end = matching_paren(after_name, open)?;
    let args = after_name[open + 1..args_end].trim().to_string();
    let tail = &after_name[args_end + 1..];

    let dollar_body = extract_dollar_body(tail);
    // search the header/footer only, so LANGUAGE inside a body cannot win
    let language_search_space = match &dollar_body {
        Some(body) => {
            let mut outside = tail.to_string();
            if let Some(at) = outside.find(body.as_str()) {
                outside.replace_range(at..at + body.len(), " ");
            }
            outside
        }
        None => tail.to_string(),
    };
    let language = LANGUAGE_TAG
        .captures(&language_search_space)
        .map(|c| c[1].to_lowercase());

    let return_expr = if dollar_body.is_none() {
        RETURN_BODY
            .captures(tail)
            .map(|c| c[1].trim().to_string())
    } else {
        None
    };

    Some(Routine {
        kind,
        or_replace,
        name,
        args,
        language,
        dollar_body,
        return_expr,
    })
}

/// Read a dotted, possibly-quoted identifier chain off the front of `text`.
fn read_name(text: &str) -> Option<(String, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            if b == b'"' {
                // doubled quotes stay inside the identifier
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                in_quotes = false;
            }
            i += 1;
        } else {
            match b {
                b'"' => {
                    in_quotes = true;
                    i += 1;
                }
                b'(' => break,
                b if b.is_ascii_whitespace() => break,
                _ => i += 1,
            }
        }
    }
    if i == 0 {
        return None;
    }
    Some((text[..i].to_string(), &text[i..]))
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Content of the first dollar-quoted span in `text`.
fn extract_dollar_body(text: &str) -> Option<String> {
    let delim = DOLLAR_DELIMITER.find(text)?;
    let tag = delim.as_str();
    let body_start = delim.end();
    let body_end = text[body_start..].find(tag)? + body_start;
    Some(text[body_start..body_end].to_string())
}

/// Regex fallback for `(table, column)` pairs in bodies the parser cannot
/// handle (plpgsql, dynamic SQL). Single-quoted literals are masked first so
/// SQL inside strings is not scanned.
pub(crate) fn column_refs_regex(body: &str) -> Vec<TableColumnRef> {
    let masked = mask_single_quoted(body);
    let mut refs: Vec<TableColumnRef> = COLUMN_REF
        .captures_iter(&masked)
        .map(|c| TableColumnRef {
            table: c[1].to_lowercase(),
            column: c[2].to_lowercase(),
        })
        .collect();
    refs.sort();
    refs.dedup();
    refs
}

fn mask_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_string {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                } else {
                    in_string = false;
                }
            }
            out.push(' ');
        } else if c == '\'' {
            in_string = true;
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "functions_test.rs"]
mod tests;
