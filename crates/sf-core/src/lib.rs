//! sf-core - Core library for Schemaflow
//!
//! This crate provides the schema model, per-kind diff bucketing, the SQL
//! vertex generators, the plan graph, and the deterministic scheduler that
//! together turn two PostgreSQL schema snapshots into an ordered migration
//! plan.

pub mod diff;
pub mod error;
pub mod graph;
pub mod ident;
pub mod name;
pub mod plan;
pub mod schema;
pub mod statement;

mod generators;
mod planner;
mod serde_helpers;

pub use diff::{KindDiff, ObjectDiff, SchemaDiff};
pub use error::{PlanError, PlanResult};
pub use graph::{DiffKind, Edge, ObjectKind, VertexId};
pub use name::SchemaQualifiedName;
pub use plan::{Plan, PlanOptions};
pub use planner::generate_plan;
pub use schema::Schema;
pub use statement::{HazardKind, MigrationHazard, Statement};
