//! Immutable schema snapshot model.
//!
//! A [`Schema`] is one side (old or new) of a migration: sorted, normalized
//! lists of every supported object kind. Snapshots are built once by an
//! external collaborator (for example the DDL snapshot builder in `sf-sql`)
//! and never mutated afterwards.

mod event_trigger;
mod function;
mod procedure;
mod table;
mod view;

pub mod testing;

pub use event_trigger::EventTrigger;
pub use function::{Function, TableColumnRef, TRACKABLE_LANGUAGE};
pub use procedure::Procedure;
pub use table::{CheckConstraint, Column, Table};
pub use view::View;

use crate::name::SchemaQualifiedName;
use serde::{Deserialize, Serialize};

/// Common surface shared by all schema object kinds.
///
/// The stable id is the canonical map key used by diff bucketing and by plan
/// vertex identity: the fully-qualified escaped name for schema-qualified
/// kinds, the escaped bare name for event triggers.
pub trait SchemaObject: Clone + PartialEq {
    /// Canonical identity string for matching old against new.
    fn stable_id(&self) -> String;
}

/// One snapshot of a database schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub views: Vec<View>,
    pub functions: Vec<Function>,
    pub procedures: Vec<Procedure>,
    pub event_triggers: Vec<EventTrigger>,
}

impl Schema {
    /// Sort all object lists by stable id and normalize every object's
    /// dependency lists. Idempotent: normalizing twice yields an identical
    /// snapshot, which is what makes snapshot equality (and therefore alter
    /// detection) well defined.
    pub fn normalize(mut self) -> Self {
        self.tables = normalize_objects(self.tables, Table::normalize);
        self.views = normalize_objects(self.views, View::normalize);
        self.functions = normalize_objects(self.functions, Function::normalize);
        self.procedures = normalize_objects(self.procedures, Procedure::normalize);
        self.event_triggers = normalize_objects(self.event_triggers, EventTrigger::normalize);
        self
    }
}

fn normalize_objects<T, F>(objects: Vec<T>, normalize_one: F) -> Vec<T>
where
    T: SchemaObject,
    F: Fn(T) -> T,
{
    let mut normalized: Vec<T> = objects.into_iter().map(normalize_one).collect();
    normalized.sort_by_key(|o| o.stable_id());
    normalized
}

/// Sort a dependency list by fully-qualified name and drop duplicates.
pub(crate) fn normalize_dependency_list(mut deps: Vec<SchemaQualifiedName>) -> Vec<SchemaQualifiedName> {
    deps.sort();
    deps.dedup();
    deps
}
