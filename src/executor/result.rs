use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one plan step. Exactly one of `result` / `error` is set, and
/// which one is determined by `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: u32,
    pub success: bool,
    pub result: Option<Map<String, Value>>,
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(step: u32, result: Map<String, Value>) -> Self {
        Self {
            step,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(step: u32, error: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Whether the success flag agrees with which payload is present.
    pub fn is_consistent(&self) -> bool {
        self.success == self.result.is_some() && self.success == self.error.is_none()
    }
}
