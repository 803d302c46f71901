use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter key models sometimes add to name a sub-operation. Tools never
/// receive it.
pub const RESERVED_PARAMETER: &str = "operation";

/// One tool invocation within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_number: u32,
    pub description: String,
    pub tool: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl PlanStep {
    pub fn new(
        step_number: u32,
        description: impl Into<String>,
        tool: impl Into<String>,
        mut parameters: Map<String, Value>,
    ) -> Self {
        parameters.remove(RESERVED_PARAMETER);
        Self {
            step_number,
            description: description.into(),
            tool: tool.into(),
            parameters,
        }
    }

    /// Parameters as handed to the tool: everything except the reserved key.
    pub fn execution_parameters(&self) -> Map<String, Value> {
        let mut params = self.parameters.clone();
        params.remove(RESERVED_PARAMETER);
        params
    }
}

/// Ordered steps for one task. `steps` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub task: String,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(task: impl Into<String>, steps: Vec<PlanStep>) -> Self {
        Self {
            task: task.into(),
            steps,
        }
    }

    pub fn empty(task: impl Into<String>) -> Self {
        Self::new(task, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Keep at most `max_steps` steps. Returns how many were dropped.
    pub fn truncate(&mut self, max_steps: usize) -> usize {
        let dropped = self.steps.len().saturating_sub(max_steps);
        self.steps.truncate(max_steps);
        dropped
    }
}
