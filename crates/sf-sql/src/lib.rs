//! sf-sql - DDL parsing layer for Schemaflow
//!
//! This crate turns PostgreSQL DDL scripts into the normalized
//! [`Schema`](sf_core::Schema) snapshots the planner consumes: a quote- and
//! dollar-quote-aware statement splitter, table/view parsing via
//! sqlparser-rs, and best-effort scanners for functions, procedures, and
//! event triggers.

pub mod error;
pub mod relations;
pub mod snapshot;
pub mod split;

mod functions;

pub use error::SqlError;
pub use relations::ObjectRef;
pub use snapshot::snapshot_from_ddl;
pub use split::split_statements;
