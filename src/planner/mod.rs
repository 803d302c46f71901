//! Plan generation: ask the model for a step list over the registered tools,
//! and fall back to keyword patterns when that fails.

pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod types;

pub use fallback::fallback_plan;
pub use parser::PlanParser;
pub use types::{Plan, PlanStep, RESERVED_PARAMETER};

use crate::llm::LlmClient;
use crate::tools::ToolRegistry;
use prompt::{PLANNER_SYSTEM_PROMPT, build_planning_prompt};
use std::sync::Arc;

pub struct Planner {
    llm: LlmClient,
    registry: Arc<ToolRegistry>,
    temperature: f64,
}

impl Planner {
    pub fn new(llm: LlmClient, registry: Arc<ToolRegistry>, temperature: f64) -> Self {
        Self {
            llm,
            registry,
            temperature,
        }
    }

    /// Produce a plan for `task`. Never fails: model, JSON and validation
    /// errors all route to [`fallback_plan`].
    pub async fn create_plan(&self, task: &str) -> Plan {
        match self.plan_with_llm(task).await {
            Ok(plan) => {
                tracing::info!(steps = plan.len(), "Plan created by LLM");
                plan
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM planning failed, using pattern fallback");
                let plan = fallback_plan(task);
                tracing::info!(steps = plan.len(), "Fallback plan created");
                plan
            }
        }
    }

    async fn plan_with_llm(&self, task: &str) -> anyhow::Result<Plan> {
        let prompt = build_planning_prompt(task, &self.registry.specs());
        tracing::debug!(%prompt, "Planning prompt");

        let raw = self
            .llm
            .generate_json(PLANNER_SYSTEM_PROMPT, &prompt, self.temperature)
            .await?;
        let plan = PlanParser::parse(task, &raw)?;

        for step in &plan.steps {
            if !self.registry.contains(&step.tool) {
                tracing::warn!(
                    step = step.step_number,
                    tool = %step.tool,
                    "Plan references an unregistered tool"
                );
            }
        }
        Ok(plan)
    }
}
