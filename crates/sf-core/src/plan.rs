//! The planner's output: an ordered statement list plus aggregated hazards.

use crate::statement::{HazardKind, MigrationHazard, Statement};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::time::Duration;

/// Caller-supplied knobs threaded into every emitted statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub default_statement_timeout: Duration,
    pub default_lock_timeout: Duration,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            default_statement_timeout: Duration::from_secs(3),
            default_lock_timeout: Duration::from_millis(1500),
        }
    }
}

/// An ordered migration plan.
///
/// `statements` is the topological linearization of the plan graph;
/// `hazards` is the distinct union (by kind and message) of every
/// statement-level hazard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub statements: Vec<Statement>,
    pub hazards: Vec<MigrationHazard>,
}

impl Plan {
    /// True when the schemas already match: no statements, no hazards.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.hazards.is_empty()
    }

    /// The distinct hazard kinds present anywhere in the plan.
    pub fn hazard_kinds(&self) -> BTreeSet<HazardKind> {
        self.hazards.iter().map(|h| h.kind).collect()
    }

    /// The DDL strings in execution order.
    pub fn ddl(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(|s| s.ddl.as_str())
    }

    /// SHA-256 hex digest of the DDL sequence.
    ///
    /// Plans are deterministic, so the fingerprint identifies a plan across
    /// runs and machines; review workflows pin it to detect drift between
    /// approval and execution.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for statement in &self.statements {
            hasher.update(statement.ddl.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}
