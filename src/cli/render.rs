//! Text rendering for `run` and `interactive`. Everything returns a `String`
//! so the caller decides where it goes.

use opsassist::executor::StepResult;
use opsassist::pipeline::TaskRun;
use opsassist::planner::Plan;
use opsassist::ui::style;
use opsassist::utils::text::truncate_with_ellipsis;
use opsassist::verifier::VerificationReport;
use serde_json::{Map, Value, json};
use std::fmt::Write;

const RULE_WIDTH: usize = 60;
const MAX_LISTED_REPOS: usize = 5;
const DESCRIPTION_CHARS: usize = 80;

pub fn rule() -> String {
    style::dim("=".repeat(RULE_WIDTH))
}

pub fn render_plan(plan: &Plan) -> String {
    let body = serde_json::to_string_pretty(plan).unwrap_or_else(|e| format!("<unprintable plan: {e}>"));
    format!("Plan generated:\n{body}")
}

/// One line per step: `Step N: Success` or `Step N: Failed - error`.
pub fn render_step_outcomes(results: &[StepResult]) -> String {
    let mut out = String::new();
    for result in results {
        let label = format!("Step {}:", result.step);
        if result.success {
            let _ = writeln!(out, "{} {}", style::accent(label), style::success("Success"));
        } else {
            let error = result.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(
                out,
                "{} {} - {error}",
                style::accent(label),
                style::failure("Failed")
            );
        }
    }
    out
}

/// Final report: status, summary, details, data, notes, then failed steps.
pub fn render_report(report: &VerificationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", style::header("FINAL RESULT"));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Status: {}", style::status_badge(report.status));

    if let Some(error) = &report.error {
        let _ = writeln!(out, "{}", style::failure(error));
    }

    if let Some(formatted) = &report.formatted_result {
        if !formatted.summary.is_empty() {
            let _ = writeln!(out, "\n{}", style::header("Summary:"));
            let _ = writeln!(out, "  {}", formatted.summary);
        }

        if !formatted.details.is_empty() {
            let _ = writeln!(out, "\n{}", style::header("Details:"));
            for detail in &formatted.details {
                let _ = writeln!(out, "  {} {detail}", style::accent("•"));
            }
        }

        if !formatted.data.is_empty() {
            let _ = writeln!(out, "\n{}", style::header("Data:"));
            out.push_str(&render_data(&formatted.data));
        }

        if !formatted.notes.is_empty() {
            let _ = writeln!(out, "\n{}", style::header("Notes:"));
            let _ = writeln!(out, "  {}", formatted.notes);
        }
    }

    if !report.failed_steps.is_empty() {
        let _ = writeln!(out, "\n{}", style::yellow("Issues encountered:"));
        for step in &report.failed_steps {
            let error = step.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "  Step {}: {error}", step.step);
        }
    }

    let _ = writeln!(out, "{}", rule());
    out
}

fn render_data(data: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in data {
        if let Some(weather) = as_weather(key, value) {
            out.push_str(&render_weather(weather));
        } else if let Some(repos) = as_repositories(key, value) {
            out.push_str(&render_repositories(repos));
        } else {
            match value {
                Value::Object(_) | Value::Array(_) => {
                    let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
                    let _ = writeln!(out, "  {}:", style::cyan(key));
                    for line in pretty.lines() {
                        let _ = writeln!(out, "    {line}");
                    }
                }
                Value::String(s) => {
                    let _ = writeln!(out, "  {}: {}", style::cyan(key), style::value(s));
                }
                other => {
                    let _ = writeln!(out, "  {}: {}", style::cyan(key), style::value(other));
                }
            }
        }
    }
    out
}

fn as_weather<'a>(key: &str, value: &'a Value) -> Option<&'a Map<String, Value>> {
    let map = value.as_object()?;
    (key == "weather" || map.contains_key("temperature_c")).then_some(map)
}

fn as_repositories<'a>(key: &str, value: &'a Value) -> Option<&'a Vec<Value>> {
    match value {
        Value::Array(items) if key.ends_with("repositories") => Some(items),
        Value::Object(map) => map.get("repositories").and_then(Value::as_array),
        _ => None,
    }
}

fn field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_weather(weather: &Map<String, Value>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", style::header("Weather Information:"));
    if weather.contains_key("error") {
        let _ = writeln!(
            out,
            "    {} {}",
            style::failure("Unavailable:"),
            field(weather, "error")
        );
        return out;
    }
    let _ = writeln!(
        out,
        "    Location: {}, {}",
        style::value(field(weather, "city")),
        field(weather, "country")
    );
    let _ = writeln!(
        out,
        "    Temperature: {}°C ({}°F)",
        field(weather, "temperature_c"),
        field(weather, "temperature_f")
    );
    let _ = writeln!(out, "    Condition: {}", field(weather, "condition"));
    let _ = writeln!(out, "    Humidity: {}%", field(weather, "humidity"));
    let _ = writeln!(out, "    Wind Speed: {} km/h", field(weather, "wind_kph"));
    out
}

fn render_repositories(repos: &[Value]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {}",
        style::header(format!("GitHub Repositories ({} found):", repos.len()))
    );
    for repo in repos.iter().take(MAX_LISTED_REPOS).filter_map(Value::as_object) {
        let _ = writeln!(out, "    {} {}", style::accent("•"), field(repo, "name"));
        let stars = repo.get("stars").and_then(Value::as_u64).unwrap_or(0);
        let _ = writeln!(
            out,
            "      Stars: {stars} | Language: {}",
            field(repo, "language")
        );
        let _ = writeln!(out, "      URL: {}", style::url(field(repo, "url")));
        if let Some(description) = repo
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
        {
            let _ = writeln!(
                out,
                "      Description: {}",
                truncate_with_ellipsis(description, DESCRIPTION_CHARS)
            );
        }
    }
    out
}

/// `--output json` body.
pub fn json_output(run: &TaskRun) -> Value {
    json!({
        "task": run.task,
        "plan": run.plan,
        "execution_results": run.execution_results,
        "final_result": run.final_result,
    })
}

pub fn json_error(task: &str, error: &anyhow::Error) -> Value {
    json!({ "error": format!("{error:#}"), "task": task })
}
