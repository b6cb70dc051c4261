//! Per-kind diff bucketing of old vs new snapshots.
//!
//! Bucketing is purely local to one object kind and keyed on the stable id;
//! cross-kind matching is never attempted. Objects present on both sides are
//! compared with deep value equality over their normalized form.

use crate::schema::{EventTrigger, Function, Procedure, Schema, SchemaObject, Table, View};
use std::collections::BTreeMap;

/// A matched old/new pair of one object.
#[derive(Debug, Clone)]
pub struct ObjectDiff<T> {
    pub old: T,
    pub new: T,
}

/// The diff buckets for one object kind.
///
/// `unchanged` holds matched pairs that compare equal. They produce no
/// statements, but the planner still walks them so that every snapshot object
/// anchors a vertex in the plan graph (a new view must be able to depend on a
/// table nothing else touches).
#[derive(Debug, Clone)]
pub struct KindDiff<T> {
    pub adds: Vec<T>,
    pub deletes: Vec<T>,
    pub alters: Vec<ObjectDiff<T>>,
    pub unchanged: Vec<ObjectDiff<T>>,
}

impl<T> Default for KindDiff<T> {
    fn default() -> Self {
        Self {
            adds: Vec::new(),
            deletes: Vec::new(),
            alters: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

impl<T> KindDiff<T> {
    /// True when nothing of this kind changed.
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.deletes.is_empty() && self.alters.is_empty()
    }
}

/// Bucket two sorted object lists of one kind by stable id.
pub fn diff_objects<T: SchemaObject>(old: &[T], new: &[T]) -> KindDiff<T> {
    let old_by_id: BTreeMap<String, &T> = old.iter().map(|o| (o.stable_id(), o)).collect();
    let new_by_id: BTreeMap<String, &T> = new.iter().map(|o| (o.stable_id(), o)).collect();

    let mut diff = KindDiff::default();

    for (id, new_obj) in &new_by_id {
        match old_by_id.get(id) {
            None => diff.adds.push((*new_obj).clone()),
            Some(old_obj) if *old_obj == *new_obj => diff.unchanged.push(ObjectDiff {
                old: (*old_obj).clone(),
                new: (*new_obj).clone(),
            }),
            Some(old_obj) => diff.alters.push(ObjectDiff {
                old: (*old_obj).clone(),
                new: (*new_obj).clone(),
            }),
        }
    }

    for (id, old_obj) in &old_by_id {
        if !new_by_id.contains_key(id) {
            diff.deletes.push((*old_obj).clone());
        }
    }

    diff
}

/// All per-kind buckets between two snapshots.
#[derive(Debug, Clone)]
pub struct SchemaDiff {
    pub tables: KindDiff<Table>,
    pub views: KindDiff<View>,
    pub functions: KindDiff<Function>,
    pub procedures: KindDiff<Procedure>,
    pub event_triggers: KindDiff<EventTrigger>,
}

impl SchemaDiff {
    /// Bucket every kind. Both snapshots must already be normalized.
    pub fn between(old: &Schema, new: &Schema) -> Self {
        Self {
            tables: diff_objects(&old.tables, &new.tables),
            views: diff_objects(&old.views, &new.views),
            functions: diff_objects(&old.functions, &new.functions),
            procedures: diff_objects(&old.procedures, &new.procedures),
            event_triggers: diff_objects(&old.event_triggers, &new.event_triggers),
        }
    }

    /// True when every bucket of every kind is empty.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.views.is_empty()
            && self.functions.is_empty()
            && self.procedures.is_empty()
            && self.event_triggers.is_empty()
    }
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
