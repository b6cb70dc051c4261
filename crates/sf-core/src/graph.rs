//! The plan graph: vertices, "must run before" edges, and the deterministic
//! topological scheduler.
//!
//! A vertex is identified by `(kind, name, diff kind)`. Add and Alter share
//! one vertex id because both re-establish the object's presence; Delete is a
//! separate vertex so edges can distinguish "must exist before X" from "must
//! be torn down before X's teardown". The scheduler never looks at statement
//! text: ordering comes entirely from edges, with ties broken by the lexical
//! order of vertex ids so equal inputs always produce byte-identical plans.

use crate::error::{PlanError, PlanResult};
use crate::statement::Statement;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The closed set of object kinds the planner schedules.
///
/// Variant order matches the lexical order of the kind tags; vertex-id
/// ordering relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    EventTrigger,
    Function,
    Procedure,
    Table,
    View,
}

impl ObjectKind {
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::EventTrigger => "event_trigger",
            ObjectKind::Function => "function",
            ObjectKind::Procedure => "procedure",
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which side of an object's lifecycle a vertex represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// The object is present after this vertex runs (created or altered)
    AddAlter,
    /// The object is gone after this vertex runs
    Delete,
}

impl DiffKind {
    pub fn tag(self) -> &'static str {
        match self {
            DiffKind::AddAlter => "add_alter",
            DiffKind::Delete => "delete",
        }
    }
}

/// Identity of one plan vertex: `(kind, fq-escaped name, diff kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VertexId {
    pub kind: ObjectKind,
    pub name: String,
    pub diff_kind: DiffKind,
}

impl VertexId {
    pub fn new(kind: ObjectKind, name: impl Into<String>, diff_kind: DiffKind) -> Self {
        Self {
            kind,
            name: name.into(),
            diff_kind,
        }
    }

    /// Edge that makes `self` run strictly after `dependency`.
    pub fn runs_after(&self, dependency: VertexId) -> Edge {
        Edge {
            from: dependency,
            to: self.clone(),
        }
    }

    /// Edge that makes `self` run strictly before `dependent`.
    pub fn runs_before(&self, dependent: VertexId) -> Edge {
        Edge {
            from: self.clone(),
            to: dependent,
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind.tag(), self.name, self.diff_kind.tag())
    }
}

/// A "must run strictly before" constraint between two vertices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

/// The frozen set of vertices and edges a plan is scheduled from.
#[derive(Debug, Default)]
pub struct PlanGraph {
    vertices: BTreeMap<VertexId, Vec<Statement>>,
    edges: BTreeSet<Edge>,
}

impl PlanGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex. Insertion is idempotent: a second insertion with
    /// empty statements keeps the existing ones, non-empty statements replace
    /// an empty vertex, and two conflicting non-empty sequences for the same
    /// id are a generator bug.
    pub fn add_vertex(&mut self, id: VertexId, statements: Vec<Statement>) -> PlanResult<()> {
        match self.vertices.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(statements);
            }
            Entry::Occupied(mut entry) => {
                if statements.is_empty() {
                    // keep whatever is already there
                } else if entry.get().is_empty() {
                    entry.insert(statements);
                } else if *entry.get() != statements {
                    return Err(PlanError::InvariantViolation {
                        message: format!(
                            "conflicting statements emitted for vertex {}",
                            entry.key()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.insert(edge);
    }

    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn statements_for(&self, id: &VertexId) -> Option<&[Statement]> {
        self.vertices.get(id).map(|s| s.as_slice())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Linearize the graph.
    ///
    /// Kahn's algorithm over a petgraph store: repeatedly take the smallest
    /// ready vertex (lexical vertex-id order), so the result is deterministic
    /// for equal inputs. Fails with [`PlanError::DanglingEdge`] if an edge
    /// endpoint was never inserted and with [`PlanError::CycleDetected`]
    /// listing the participating vertices if vertices remain after
    /// exhaustion.
    pub fn topological_sort(&self) -> PlanResult<Vec<VertexId>> {
        let mut graph: DiGraph<VertexId, ()> = DiGraph::new();
        let mut node_map: BTreeMap<&VertexId, NodeIndex> = BTreeMap::new();

        for id in self.vertices.keys() {
            node_map.insert(id, graph.add_node(id.clone()));
        }

        for edge in &self.edges {
            let from = *node_map.get(&edge.from).ok_or_else(|| dangling(edge, &edge.from))?;
            let to = *node_map.get(&edge.to).ok_or_else(|| dangling(edge, &edge.to))?;
            graph.update_edge(from, to, ());
        }

        let mut in_degree: BTreeMap<VertexId, usize> = BTreeMap::new();
        for (id, &idx) in &node_map {
            let degree = graph.neighbors_directed(idx, Direction::Incoming).count();
            in_degree.insert((*id).clone(), degree);
        }

        let mut ready: BTreeSet<VertexId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| id.clone())
            .collect();

        let mut order = Vec::with_capacity(self.vertices.len());
        while let Some(id) = ready.pop_first() {
            let idx = node_map[&id];
            for neighbor in graph.neighbors_directed(idx, Direction::Outgoing) {
                let neighbor_id = &graph[neighbor];
                let degree = in_degree
                    .get_mut(neighbor_id)
                    .expect("neighbor is a known vertex");
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(neighbor_id.clone());
                }
            }
            order.push(id);
        }

        if order.len() != self.vertices.len() {
            let scheduled: BTreeSet<&VertexId> = order.iter().collect();
            let remaining: Vec<String> = self
                .vertices
                .keys()
                .filter(|id| !scheduled.contains(id))
                .map(|id| id.to_string())
                .collect();
            return Err(PlanError::CycleDetected {
                vertices: remaining,
            });
        }

        Ok(order)
    }
}

fn dangling(edge: &Edge, missing: &VertexId) -> PlanError {
    PlanError::DanglingEdge {
        from: edge.from.to_string(),
        to: edge.to.to_string(),
        missing: missing.to_string(),
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
