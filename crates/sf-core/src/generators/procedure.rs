//! Procedure vertex generator.
//!
//! Procedure dependencies are untracked beyond the name, so procedures emit
//! no edges; an alter is a drop followed by re-emitting the stored text.

use super::{procedure_vertex_id, statement, VertexGenerator};
use crate::error::PlanResult;
use crate::generators::generator_failure;
use crate::graph::{DiffKind, Edge, ObjectKind, VertexId};
use crate::plan::PlanOptions;
use crate::schema::Procedure;
use crate::statement::Statement;

pub(crate) struct ProcedureGenerator {
    options: PlanOptions,
}

impl ProcedureGenerator {
    pub(crate) fn new(options: &PlanOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }
}

impl VertexGenerator for ProcedureGenerator {
    type Object = Procedure;

    fn add(&self, procedure: &Procedure) -> PlanResult<Vec<Statement>> {
        if procedure.definition.trim().is_empty() {
            return Err(generator_failure(
                ObjectKind::Procedure,
                procedure.name.fq_escaped_name(),
                "procedure has an empty definition",
            ));
        }
        Ok(vec![statement(
            &self.options,
            procedure.definition.clone(),
            vec![],
        )])
    }

    fn delete(&self, procedure: &Procedure) -> PlanResult<Vec<Statement>> {
        let ddl = format!("DROP PROCEDURE {}", procedure.name.fq_escaped_name());
        Ok(vec![statement(&self.options, ddl, vec![])])
    }

    fn alter(&self, old: &Procedure, new: &Procedure) -> PlanResult<Vec<Statement>> {
        if old == new {
            return Ok(vec![]);
        }
        let mut statements = self.delete(old)?;
        statements.extend(self.add(new)?);
        Ok(statements)
    }

    fn vertex_id(&self, procedure: &Procedure, diff_kind: DiffKind) -> VertexId {
        procedure_vertex_id(&procedure.name, diff_kind)
    }

    fn add_alter_deps(
        &self,
        _new: &Procedure,
        _old: Option<&Procedure>,
    ) -> PlanResult<Vec<Edge>> {
        Ok(vec![])
    }

    fn delete_deps(&self, _procedure: &Procedure) -> PlanResult<Vec<Edge>> {
        Ok(vec![])
    }
}

#[cfg(test)]
#[path = "procedure_test.rs"]
mod tests;
