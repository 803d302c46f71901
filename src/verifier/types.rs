use crate::executor::StepResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Overall outcome of a run, derived from the step results alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Partial,
    Failed,
}

impl ReportStatus {
    /// `failed` only when there are failures and nothing succeeded,
    /// `partial` on any failure otherwise.
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        match (succeeded, failed) {
            (_, 0) => Self::Success,
            (0, _) => Self::Failed,
            _ => Self::Partial,
        }
    }
}

/// Human-readable rendering of the successful results.
///
/// `status` is descriptive text written by the formatter; the authoritative
/// status lives on [`VerificationReport`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub summary: String,
    pub data: Map<String, Value>,
    pub details: Vec<String>,
    pub status: String,
    pub notes: String,
}

impl FormattedResult {
    /// Normalize a model reply. Missing keys default, non-string details are
    /// stringified and a non-object `data` is wrapped as `{"value": ..}`.
    pub fn from_map(mut raw: Map<String, Value>) -> Self {
        let data = match raw.remove("data") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                let mut wrapped = Map::new();
                wrapped.insert("value".into(), other);
                wrapped
            }
        };

        let details = match raw.remove("details") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.into_iter().map(text_of).collect(),
            Some(single) => vec![text_of(single)],
        };

        Self {
            summary: raw.remove("summary").map(text_of).unwrap_or_default(),
            data,
            details,
            status: raw.remove("status").map(text_of).unwrap_or_default(),
            notes: raw.remove("notes").map(text_of).unwrap_or_default(),
        }
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Final report for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub status: ReportStatus,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub failed_steps: Vec<StepResult>,
    pub formatted_result: Option<FormattedResult>,
}

impl VerificationReport {
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}
