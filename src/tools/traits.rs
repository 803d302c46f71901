use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

/// Structured payload a tool hands back to the executor.
pub type ToolOutput = Map<String, Value>;

/// Description of a tool for the planning prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Core tool trait: implement for any capability the planner may schedule
pub trait Tool: Send + Sync {
    /// Tool name (referenced by plan steps)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON schema for parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the step's parameters.
    ///
    /// Adapters that talk to remote APIs report upstream failures inside the
    /// returned mapping; `Err` is reserved for failures the tool cannot
    /// describe that way.
    fn execute<'a>(
        &'a self,
        params: Map<String, Value>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolOutput>> + Send + 'a>>;

    /// Get the full spec for prompt construction
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
