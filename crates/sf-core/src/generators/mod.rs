//! Per-kind SQL vertex generators.
//!
//! Every object kind implements [`VertexGenerator`]: pure translation of one
//! diff entry into DDL statements plus the dependency edges that place its
//! vertices in the plan graph. Generators hold only the read-only new-side
//! indices they need; they never perform I/O.

mod event_trigger;
mod function;
mod procedure;
mod table;
mod view;

pub(crate) use event_trigger::EventTriggerGenerator;
pub(crate) use function::FunctionGenerator;
pub(crate) use procedure::ProcedureGenerator;
pub(crate) use table::TableGenerator;
pub(crate) use view::ViewGenerator;

use crate::diff::KindDiff;
use crate::error::{PlanError, PlanResult};
use crate::graph::{DiffKind, Edge, ObjectKind, PlanGraph, VertexId};
use crate::name::SchemaQualifiedName;
use crate::plan::PlanOptions;
use crate::statement::{MigrationHazard, Statement};

/// The per-kind generator contract.
///
/// `alter` must return an empty list for equal objects. Kinds that cannot be
/// altered in place emit drop-then-create from their single `AddAlter`
/// vertex; only functions re-emit `CREATE OR REPLACE` without a drop.
pub(crate) trait VertexGenerator {
    type Object;

    fn add(&self, obj: &Self::Object) -> PlanResult<Vec<Statement>>;
    fn delete(&self, obj: &Self::Object) -> PlanResult<Vec<Statement>>;
    fn alter(&self, old: &Self::Object, new: &Self::Object) -> PlanResult<Vec<Statement>>;
    fn vertex_id(&self, obj: &Self::Object, diff_kind: DiffKind) -> VertexId;
    fn add_alter_deps(
        &self,
        new: &Self::Object,
        old: Option<&Self::Object>,
    ) -> PlanResult<Vec<Edge>>;
    fn delete_deps(&self, obj: &Self::Object) -> PlanResult<Vec<Edge>>;
}

/// Walk one kind's diff buckets into the graph.
///
/// Adds and alters (and matched-but-equal pairs, which contribute empty
/// vertices) produce `AddAlter` vertices; deletes produce `Delete` vertices.
/// No object ever contributes both.
pub(crate) fn collect_kind<G: VertexGenerator>(
    graph: &mut PlanGraph,
    diff: &KindDiff<G::Object>,
    generator: &G,
) -> PlanResult<()> {
    for obj in &diff.adds {
        let statements = generator.add(obj)?;
        graph.add_vertex(generator.vertex_id(obj, DiffKind::AddAlter), statements)?;
        graph.add_edges(generator.add_alter_deps(obj, None)?);
    }
    for pair in &diff.alters {
        let statements = generator.alter(&pair.old, &pair.new)?;
        graph.add_vertex(generator.vertex_id(&pair.new, DiffKind::AddAlter), statements)?;
        graph.add_edges(generator.add_alter_deps(&pair.new, Some(&pair.old))?);
    }
    for pair in &diff.unchanged {
        graph.add_vertex(generator.vertex_id(&pair.new, DiffKind::AddAlter), vec![])?;
        graph.add_edges(generator.add_alter_deps(&pair.new, Some(&pair.old))?);
    }
    for obj in &diff.deletes {
        let statements = generator.delete(obj)?;
        graph.add_vertex(generator.vertex_id(obj, DiffKind::Delete), statements)?;
        graph.add_edges(generator.delete_deps(obj)?);
    }
    Ok(())
}

/// Vertex id of a table by qualified name.
pub(crate) fn table_vertex_id(name: &SchemaQualifiedName, diff_kind: DiffKind) -> VertexId {
    VertexId::new(ObjectKind::Table, name.fq_escaped_name(), diff_kind)
}

/// Vertex id of a view by qualified name.
pub(crate) fn view_vertex_id(name: &SchemaQualifiedName, diff_kind: DiffKind) -> VertexId {
    VertexId::new(ObjectKind::View, name.fq_escaped_name(), diff_kind)
}

/// Vertex id of a function by qualified name.
pub(crate) fn function_vertex_id(name: &SchemaQualifiedName, diff_kind: DiffKind) -> VertexId {
    VertexId::new(ObjectKind::Function, name.fq_escaped_name(), diff_kind)
}

/// Vertex id of a procedure by qualified name.
pub(crate) fn procedure_vertex_id(name: &SchemaQualifiedName, diff_kind: DiffKind) -> VertexId {
    VertexId::new(ObjectKind::Procedure, name.fq_escaped_name(), diff_kind)
}

/// Build a statement with the plan's default timeouts.
pub(crate) fn statement(
    options: &PlanOptions,
    ddl: String,
    hazards: Vec<MigrationHazard>,
) -> Statement {
    Statement {
        ddl,
        timeout: options.default_statement_timeout,
        lock_timeout: options.default_lock_timeout,
        hazards,
    }
}

/// A structured generator failure for one object.
pub(crate) fn generator_failure(
    kind: ObjectKind,
    object: impl Into<String>,
    message: impl Into<String>,
) -> PlanError {
    PlanError::GeneratorFailure {
        kind: kind.tag(),
        object: object.into(),
        message: message.into(),
    }
}
