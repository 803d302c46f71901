//! Step execution: dispatch each plan step to its tool by name and record a
//! [`StepResult`]. A failing step never stops the rest of the plan.

pub mod result;

pub use result::StepResult;

use crate::error::ToolError;
use crate::planner::PlanStep;
use crate::tools::ToolRegistry;
use futures_util::{StreamExt, stream};
use std::sync::Arc;

pub struct Executor {
    registry: Arc<ToolRegistry>,
    max_concurrency: usize,
}

impl Executor {
    pub fn new(registry: Arc<ToolRegistry>, max_concurrency: usize) -> Self {
        Self {
            registry,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub async fn execute_step(&self, step: &PlanStep) -> StepResult {
        let Some(tool) = self.registry.get(&step.tool) else {
            tracing::warn!(step = step.step_number, tool = %step.tool, "Unknown tool");
            let error = ToolError::NotFound {
                name: step.tool.clone(),
            };
            return StepResult::failed(step.step_number, error.to_string());
        };

        tracing::info!(step = step.step_number, tool = %step.tool, "Executing step");
        match tool.execute(step.execution_parameters()).await {
            Ok(output) => StepResult::succeeded(step.step_number, output),
            Err(e) => {
                tracing::warn!(step = step.step_number, tool = %step.tool, error = %e, "Step failed");
                StepResult::failed(step.step_number, format!("{e:#}"))
            }
        }
    }

    /// Run every step, up to `max_concurrency` at a time. Results come back in
    /// plan order regardless of completion order.
    pub async fn execute_plan(&self, steps: &[PlanStep]) -> Vec<StepResult> {
        let pending: Vec<_> = steps.iter().map(|step| self.execute_step(step)).collect();
        let results: Vec<StepResult> = stream::iter(pending)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(
            steps = results.len(),
            failed,
            "Plan execution finished"
        );
        results
    }
}
