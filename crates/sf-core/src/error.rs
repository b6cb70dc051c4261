//! Error types for sf-core

use thiserror::Error;

/// Planner error type for Schemaflow
#[derive(Error, Debug)]
pub enum PlanError {
    /// P001: The dependency graph contains a cycle
    #[error("[P001] Dependency cycle detected between: {}", vertices.join(", "))]
    CycleDetected { vertices: Vec<String> },

    /// P002: An edge references a vertex that no generator produced
    #[error("[P002] Dangling edge {from} -> {to}: vertex {missing} does not exist")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    /// P003: A generator failed while producing statements or edges
    #[error("[P003] {kind} generator failed for {object}: {message}")]
    GeneratorFailure {
        kind: &'static str,
        object: String,
        message: String,
    },

    /// P004: An internal planner invariant was violated
    #[error("[P004] Planner invariant violated: {message}")]
    InvariantViolation { message: String },
}

/// Result type alias for PlanError
pub type PlanResult<T> = Result<T, PlanError>;
