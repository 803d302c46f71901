//! Deterministic planning used when the model is unavailable or returns an
//! unusable plan.

use super::types::{Plan, PlanStep};
use crate::utils::text::title_case;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

const DEFAULT_PER_PAGE: u32 = 5;
const DEFAULT_CITY: &str = "London";
const DEFAULT_QUERY: &str = "python";
const SEARCH_KEYWORDS: [&str; 5] = ["github", "repository", "repo", "search", "find"];

static WEATHER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"weather in (\w+)",
        r"temperature in (\w+)",
        r"climate in (\w+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid weather pattern"))
    .collect()
});

static SEARCH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"find (\w+) repositories",
        r"search for (\w+) repositories",
        r"show me (\w+) repositories",
        r"(\w+) projects",
        r"(\w+) libraries",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid search pattern"))
    .collect()
});

/// First capture of the first pattern that matches.
fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn weather_params(city: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("city".into(), json!(city));
    params
}

fn search_params(query: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("query".into(), json!(query));
    params.insert("per_page".into(), json!(DEFAULT_PER_PAGE));
    params
}

/// Build a plan from keyword patterns over the lower-cased task.
///
/// At most one weather step and one search step are produced, weather first.
/// With no pattern match, a bare mention of weather or search keywords yields
/// a single default step; anything else yields an empty plan.
pub fn fallback_plan(task: &str) -> Plan {
    let lowered = task.to_lowercase();
    let mut steps = Vec::new();
    let mut next_number = 1u32;

    if let Some(city) = first_capture(&WEATHER_PATTERNS, &lowered) {
        let city = title_case(city);
        steps.push(PlanStep::new(
            next_number,
            format!("Get weather information for {city}"),
            "weather",
            weather_params(&city),
        ));
        next_number += 1;
    }

    if let Some(query) = first_capture(&SEARCH_PATTERNS, &lowered) {
        steps.push(PlanStep::new(
            next_number,
            format!("Search GitHub for {query} repositories"),
            "github_search",
            search_params(query),
        ));
    }

    if steps.is_empty() {
        if lowered.contains("weather") {
            steps.push(PlanStep::new(
                1,
                "Get weather information",
                "weather",
                weather_params(DEFAULT_CITY),
            ));
        } else if SEARCH_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            steps.push(PlanStep::new(
                1,
                "Search GitHub repositories",
                "github_search",
                search_params(DEFAULT_QUERY),
            ));
        }
    }

    Plan::new(task, steps)
}
