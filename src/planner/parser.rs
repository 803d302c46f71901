use super::types::{Plan, PlanStep, RESERVED_PARAMETER};
use crate::error::PlanError;
use serde_json::{Map, Value};

/// Validates the JSON object returned by the planning model.
pub struct PlanParser;

impl PlanParser {
    /// Turn a model reply into a [`Plan`] for `task`.
    ///
    /// The object must carry `task` and an array `steps`. Each step needs a
    /// non-empty `tool`; `description` and `parameters` default to empty and
    /// the reserved `operation` parameter is dropped. Missing or
    /// out-of-order step numbers are replaced by positional numbering.
    pub fn parse(task: &str, raw: &Map<String, Value>) -> Result<Plan, PlanError> {
        if !raw.contains_key("task") {
            return Err(PlanError::MissingField("task"));
        }
        let steps_value = raw.get("steps").ok_or(PlanError::MissingField("steps"))?;
        let Value::Array(raw_steps) = steps_value else {
            return Err(PlanError::StepsNotArray);
        };

        let mut steps = raw_steps
            .iter()
            .enumerate()
            .map(|(index, value)| parse_step(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        if !numbers_are_increasing(&steps) {
            tracing::debug!("Renumbering plan steps positionally");
            for (position, step) in (1u32..).zip(steps.iter_mut()) {
                step.step_number = position;
            }
        }

        Ok(Plan::new(task, steps))
    }
}

fn parse_step(index: usize, value: &Value) -> Result<PlanStep, PlanError> {
    let invalid = |reason: &str| PlanError::InvalidStep {
        index,
        reason: reason.to_string(),
    };

    let Value::Object(step) = value else {
        return Err(invalid("step must be an object"));
    };

    let tool = step
        .get("tool")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| invalid("missing `tool`"))?;

    let description = step
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut parameters = match step.get("parameters") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(invalid("`parameters` must be an object")),
    };
    parameters.remove(RESERVED_PARAMETER);

    // 0 marks "missing"; numbering is repaired by the caller.
    let step_number = step
        .get("step_number")
        .and_then(|n| match n {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    Ok(PlanStep {
        step_number,
        description: description.to_string(),
        tool: tool.to_string(),
        parameters,
    })
}

fn numbers_are_increasing(steps: &[PlanStep]) -> bool {
    steps.first().is_none_or(|s| s.step_number >= 1)
        && steps
            .windows(2)
            .all(|pair| pair[0].step_number < pair[1].step_number)
}
