use crate::tools::ToolSpec;
use serde_json::Value;
use std::fmt::Write;

pub const PLANNER_SYSTEM_PROMPT: &str = "You are a planning assistant that breaks down tasks into \
     executable steps using the available tools. Always respond with valid JSON only.";

/// One catalog entry per tool: name, description and named parameters.
pub fn tool_catalog(specs: &[ToolSpec]) -> String {
    let mut out = String::new();
    for spec in specs {
        let _ = writeln!(out, "- {}: {}", spec.name, spec.description);
        let Some(properties) = spec.parameters.get("properties").and_then(Value::as_object) else {
            continue;
        };
        for (name, schema) in properties {
            let kind = schema.get("type").and_then(Value::as_str).unwrap_or("any");
            let description = schema
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let default = schema
                .get("default")
                .map(|d| format!(" (default: {d})"))
                .unwrap_or_default();
            let _ = writeln!(out, "    - {name} ({kind}): {description}{default}");
        }
    }
    out
}

pub fn build_planning_prompt(task: &str, specs: &[ToolSpec]) -> String {
    format!(
        "Break down the following task into executable steps.\n\n\
         Task: {task}\n\n\
         Available tools:\n{catalog}\n\
         Respond with a JSON object in exactly this format:\n\
         {{\n  \"task\": \"<the task>\",\n  \"steps\": [\n    {{\n      \"step_number\": 1,\n      \
         \"description\": \"<what this step does>\",\n      \"tool\": \"<tool name>\",\n      \
         \"parameters\": {{ }}\n    }}\n  ]\n}}\n\n\
         Rules:\n\
         - Use only the tools listed above.\n\
         - Put only that tool's parameters in \"parameters\".\n\
         - Number steps from 1 in execution order.\n\
         - If no tool applies, return an empty \"steps\" array.\n\
         - Respond with JSON only.",
        catalog = tool_catalog(specs)
    )
}
