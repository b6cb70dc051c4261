//! Plan statements and migration hazards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Classification of a migration hazard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardKind {
    /// The statement destroys data (dropped views, tables, columns)
    DeletesData,
    /// Body dependencies of a non-`sql` function cannot be ordered
    HasUntrackableDependencies,
    /// The statement takes an `ACCESS EXCLUSIVE` lock while it runs
    AcquiresAccessExclusiveLock,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            HazardKind::DeletesData => "DELETES_DATA",
            HazardKind::HasUntrackableDependencies => "HAS_UNTRACKABLE_DEPENDENCIES",
            HazardKind::AcquiresAccessExclusiveLock => "ACQUIRES_ACCESS_EXCLUSIVE_LOCK",
        };
        f.write_str(tag)
    }
}

/// A hazard annotation: a kind plus a human-readable message explaining what
/// the operator should review before running the statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MigrationHazard {
    pub kind: HazardKind,
    pub message: String,
}

impl MigrationHazard {
    pub fn new(kind: HazardKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn deletes_data(message: impl Into<String>) -> Self {
        Self::new(HazardKind::DeletesData, message)
    }
}

impl fmt::Display for MigrationHazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// One executable DDL statement of the plan.
///
/// The timeouts are metadata for the downstream executor; the planner only
/// threads them through from [`PlanOptions`](crate::plan::PlanOptions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub ddl: String,
    #[serde(with = "crate::serde_helpers::duration_ms", rename = "timeout_ms")]
    pub timeout: Duration,
    #[serde(with = "crate::serde_helpers::duration_ms", rename = "lock_timeout_ms")]
    pub lock_timeout: Duration,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hazards: Vec<MigrationHazard>,
}
