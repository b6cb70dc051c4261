//! Event-trigger vertex generator.
//!
//! Event triggers cannot be altered in place (only enabled/disabled), so an
//! alter drops and recreates. A trigger must be created after its function
//! and dropped before its function is dropped.

use super::{function_vertex_id, statement, VertexGenerator};
use crate::error::PlanResult;
use crate::graph::{DiffKind, Edge, ObjectKind, VertexId};
use crate::ident::escape_string_literal;
use crate::plan::PlanOptions;
use crate::schema::{EventTrigger, Schema};
use crate::statement::Statement;
use std::collections::BTreeSet;

pub(crate) struct EventTriggerGenerator {
    functions_in_new: BTreeSet<String>,
    options: PlanOptions,
}

impl EventTriggerGenerator {
    pub(crate) fn new(new_schema: &Schema, options: &PlanOptions) -> Self {
        Self {
            functions_in_new: new_schema
                .functions
                .iter()
                .map(|f| f.name.fq_escaped_name())
                .collect(),
            options: options.clone(),
        }
    }
}

fn event_trigger_vertex_id(trigger: &EventTrigger, diff_kind: DiffKind) -> VertexId {
    VertexId::new(ObjectKind::EventTrigger, trigger.escaped_name(), diff_kind)
}

impl VertexGenerator for EventTriggerGenerator {
    type Object = EventTrigger;

    fn add(&self, trigger: &EventTrigger) -> PlanResult<Vec<Statement>> {
        let mut ddl = format!(
            "CREATE EVENT TRIGGER {} ON {}",
            trigger.escaped_name(),
            trigger.event
        );

        if !trigger.tags.is_empty() {
            let quoted: Vec<String> = trigger
                .tags
                .iter()
                .map(|tag| format!("'{}'", escape_string_literal(tag)))
                .collect();
            ddl.push_str(&format!("\n    WHEN TAG IN ({})", quoted.join(", ")));
        }

        ddl.push_str(&format!(
            "\n    EXECUTE FUNCTION {}();",
            trigger.function.fq_escaped_name()
        ));

        let mut statements = vec![statement(&self.options, ddl, vec![])];
        if !trigger.enabled {
            statements.push(statement(
                &self.options,
                format!("ALTER EVENT TRIGGER {} DISABLE", trigger.escaped_name()),
                vec![],
            ));
        }
        Ok(statements)
    }

    fn delete(&self, trigger: &EventTrigger) -> PlanResult<Vec<Statement>> {
        let ddl = format!("DROP EVENT TRIGGER IF EXISTS {}", trigger.escaped_name());
        Ok(vec![statement(&self.options, ddl, vec![])])
    }

    fn alter(&self, old: &EventTrigger, new: &EventTrigger) -> PlanResult<Vec<Statement>> {
        if old == new {
            return Ok(vec![]);
        }
        // Event triggers cannot be directly altered - must drop and recreate
        let mut statements = self.delete(old)?;
        statements.extend(self.add(new)?);
        Ok(statements)
    }

    fn vertex_id(&self, trigger: &EventTrigger, diff_kind: DiffKind) -> VertexId {
        event_trigger_vertex_id(trigger, diff_kind)
    }

    fn add_alter_deps(
        &self,
        new: &EventTrigger,
        _old: Option<&EventTrigger>,
    ) -> PlanResult<Vec<Edge>> {
        let me = event_trigger_vertex_id(new, DiffKind::AddAlter);
        Ok(vec![
            me.runs_after(function_vertex_id(&new.function, DiffKind::AddAlter))
        ])
    }

    fn delete_deps(&self, trigger: &EventTrigger) -> PlanResult<Vec<Edge>> {
        let me = event_trigger_vertex_id(trigger, DiffKind::Delete);
        let mut deps = Vec::new();
        if !self
            .functions_in_new
            .contains(&trigger.function.fq_escaped_name())
        {
            deps.push(me.runs_before(function_vertex_id(&trigger.function, DiffKind::Delete)));
        }
        Ok(deps)
    }
}

#[cfg(test)]
#[path = "event_trigger_test.rs"]
mod tests;
