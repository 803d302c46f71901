use crate::executor::StepResult;
use serde_json::Value;
use std::fmt::Write;

pub const VERIFIER_SYSTEM_PROMPT: &str =
    "You are a helpful verification assistant that formats execution results.";

/// One line per step: `Step N: Success - {json}` or `Step N: Failed - {error}`.
pub fn describe_results(results: &[StepResult]) -> String {
    let mut out = String::new();
    for result in results {
        if result.success {
            let payload = result
                .result
                .as_ref()
                .map_or_else(|| "{}".to_string(), |r| Value::Object(r.clone()).to_string());
            let _ = writeln!(out, "Step {}: Success - {payload}", result.step);
        } else {
            let error = result.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "Step {}: Failed - {error}", result.step);
        }
    }
    out
}

pub fn build_verification_prompt(task: &str, results: &[StepResult]) -> String {
    format!(
        "Format the following execution results into a clear, structured answer \
         for the original user task.\n\n\
         Original Task: {task}\n\n\
         Execution Results:\n{results}\n\
         Respond with a JSON object in exactly this format:\n\
         {{\n  \"summary\": \"<brief summary of what was accomplished>\",\n  \
         \"data\": {{ \"<key>\": \"<key results from the execution>\" }},\n  \
         \"details\": [\"<detailed information, one item per entry>\"],\n  \
         \"status\": \"success or partial\",\n  \
         \"notes\": \"<important notes or limitations>\"\n}}\n\n\
         Rules:\n\
         - Include all relevant information from the results.\n\
         - Structure the data logically.\n\
         - Mention failed steps in the notes.\n\
         - Respond with JSON only.",
        results = describe_results(results)
    )
}
