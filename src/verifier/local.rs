use super::types::FormattedResult;
use crate::executor::StepResult;
use serde_json::{Map, Value};

/// Build a formatted result from the raw step results without a model.
///
/// `reason` is why the model could not be used and ends up in `notes`.
pub fn format_locally(results: &[StepResult], reason: &str) -> FormattedResult {
    let succeeded = results.iter().filter(|r| r.success).count();
    let failed = results.len() - succeeded;

    let mut data = Map::new();
    let mut details = Vec::with_capacity(results.len());
    for result in results {
        match (&result.result, &result.error) {
            (Some(payload), _) if result.success => {
                data.insert(format!("step_{}", result.step), Value::Object(payload.clone()));
                details.push(format!("Step {}: succeeded", result.step));
            }
            (_, error) => {
                let error = error.as_deref().unwrap_or("unknown error");
                details.push(format!("Step {}: failed ({error})", result.step));
            }
        }
    }

    let status = if failed == 0 { "success" } else { "partial" };
    FormattedResult {
        summary: format!("{succeeded} of {} steps completed successfully.", results.len()),
        data,
        details,
        status: status.to_string(),
        notes: format!("Formatted locally because the language model was unavailable: {reason}"),
    }
}
