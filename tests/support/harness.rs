#![allow(dead_code)]

use opsassist::Config;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Marker present only in planning prompts.
pub const PLANNING_MARKER: &str = "Break down the following task";
/// Marker present only in verification prompts.
pub const VERIFICATION_MARKER: &str = "Original Task:";

pub fn install_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Config pointing the model at `llm` and both tools at `apis`, with retries
/// kept short.
pub fn test_config(llm: &MockServer, apis: &MockServer) -> Config {
    let mut config = Config::default();
    config.llm.base_url = Some(format!("{}/v1", llm.uri()));
    config.llm.api_key = Some("gsk-test".into());
    config.llm.timeout_secs = 5;
    config.reliability.provider_retries = 0;
    config.reliability.provider_backoff_ms = 1;
    config.tools.github_api_url = apis.uri();
    config.tools.weather_api_url = format!("{}/v1/current.json", apis.uri());
    config.tools.weather_api_key = Some("wk-test".into());
    config.tools.request_timeout_secs = 5;
    config
}

pub fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

/// Answer planning prompts with `plan`.
pub async fn mount_plan(llm: &MockServer, plan: &Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(PLANNING_MARKER))
        .respond_with(chat_reply(&plan.to_string()))
        .mount(llm)
        .await;
}

/// Answer verification prompts with `formatted`.
pub async fn mount_formatting(llm: &MockServer, formatted: &Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(VERIFICATION_MARKER))
        .respond_with(chat_reply(&formatted.to_string()))
        .mount(llm)
        .await;
}

/// Every model call fails with a server error.
pub async fn mount_llm_outage(llm: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(llm)
        .await;
}

pub fn weather_body(city: &str, country: &str) -> Value {
    json!({
        "location": {"name": city, "country": country},
        "current": {
            "temp_c": 21.5,
            "temp_f": 70.7,
            "condition": {"text": "Clear"},
            "humidity": 40,
            "wind_kph": 9.0,
            "last_updated": "2025-04-01 12:00"
        }
    })
}

pub fn search_body(names: &[&str]) -> Value {
    let items: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "full_name": format!("org/{name}"),
                "description": format!("{name} project"),
                "stargazers_count": 1000 - i,
                "html_url": format!("https://github.com/org/{name}"),
                "language": "Python",
                "topics": ["python"]
            })
        })
        .collect();
    json!({"total_count": names.len(), "items": items})
}
