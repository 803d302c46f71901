//! Plan → execute → verify orchestration.
//!
//! Stages run one after another; only the executor fans out internally.

use crate::config::Config;
use crate::error::OpsError;
use crate::executor::{Executor, StepResult};
use crate::llm::LlmClient;
use crate::planner::{Plan, Planner};
use crate::tools::{ToolRegistry, default_registry};
use crate::verifier::{VerificationReport, Verifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything produced for one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRun {
    pub task: String,
    pub plan: Plan,
    pub execution_results: Vec<StepResult>,
    pub final_result: VerificationReport,
}

pub struct Pipeline {
    planner: Planner,
    executor: Executor,
    verifier: Verifier,
}

impl Pipeline {
    pub fn new(llm: LlmClient, registry: Arc<ToolRegistry>, config: &Config) -> Self {
        Self {
            planner: Planner::new(
                llm.clone(),
                Arc::clone(&registry),
                config.llm.planner_temperature,
            ),
            executor: Executor::new(registry, config.executor.max_concurrency),
            verifier: Verifier::new(
                llm,
                config.llm.verifier_temperature,
                config.verifier.on_llm_error,
            ),
        }
    }

    /// Wire up the configured provider and the default tools.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = LlmClient::from_config(config)?;
        let registry = Arc::new(default_registry(&config.tools));
        tracing::debug!(tools = ?registry.tool_names(), model = llm.model(), "Pipeline ready");
        Ok(Self::new(llm, registry, config))
    }

    pub async fn plan(&self, task: &str) -> Plan {
        self.planner.create_plan(task).await
    }

    pub async fn execute(&self, plan: &Plan) -> Vec<StepResult> {
        self.executor.execute_plan(&plan.steps).await
    }

    pub async fn verify(
        &self,
        task: &str,
        results: &[StepResult],
    ) -> Result<VerificationReport, OpsError> {
        Ok(self.verifier.verify_and_format(task, results).await?)
    }

    /// Run all three stages for `task`. `max_steps` caps the plan length.
    pub async fn run(&self, task: &str, max_steps: Option<usize>) -> Result<TaskRun, OpsError> {
        tracing::info!(task, "Planning");
        let mut plan = self.plan(task).await;
        if let Some(limit) = max_steps {
            let dropped = plan.truncate(limit);
            if dropped > 0 {
                tracing::warn!(dropped, limit, "Plan truncated to step limit");
            }
        }

        tracing::info!(steps = plan.len(), "Executing");
        let execution_results = self.execute(&plan).await;

        tracing::info!("Verifying");
        let final_result = self.verify(task, &execution_results).await?;

        Ok(TaskRun {
            task: task.to_string(),
            plan,
            execution_results,
            final_result,
        })
    }
}
