use crate::harness::{install_crypto, mount_llm_outage, test_config, weather_body};
use opsassist::Config;
use opsassist::config::LlmErrorPolicy;
use opsassist::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start the gateway on a random loopback port and return its base URL.
async fn spawn_gateway(config: Config) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let _ = run_gateway_with_listener("127.0.0.1", listener, config).await;
    });
    format!("http://127.0.0.1:{port}")
}

async fn offline_gateway() -> (String, MockServer, MockServer) {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Tokyo", "Japan")))
        .mount(&apis)
        .await;
    let base = spawn_gateway(test_config(&llm, &apis)).await;
    (base, llm, apis)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (base, _llm, _apis) = offline_gateway().await;
    let response = client().get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "opsassist"}));
}

#[tokio::test]
async fn execute_then_fetch_task() {
    let (base, _llm, _apis) = offline_gateway().await;
    let http = client();

    let response = http
        .post(format!("{base}/execute"))
        .json(&json!({"task": "Get weather in Tokyo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "completed");
    assert!(body["error"].is_null());
    assert_eq!(body["plan"]["steps"][0]["tool"], "weather");
    assert_eq!(body["execution_results"]["steps"][0]["success"], true);
    assert_eq!(body["final_result"]["status"], "success");

    let task_id = body["task_id"].as_str().unwrap();
    assert_eq!(task_id.len(), 8);

    let fetched: Value = http
        .get(format!("{base}/tasks/{task_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["task_id"], task_id);
    assert_eq!(fetched["final_result"], body["final_result"]);
}

#[tokio::test]
async fn max_steps_zero_yields_empty_execution() {
    let (base, _llm, _apis) = offline_gateway().await;
    let body: Value = client()
        .post(format!("{base}/execute"))
        .json(&json!({"task": "Get weather in Tokyo", "max_steps": 0}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["execution_results"]["steps"], json!([]));
}

#[tokio::test]
async fn pipeline_failure_is_reported_and_stored() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Tokyo", "Japan")))
        .mount(&apis)
        .await;
    let mut config = test_config(&llm, &apis);
    config.verifier.on_llm_error = LlmErrorPolicy::Propagate;
    let base = spawn_gateway(config).await;
    let http = client();

    let response = http
        .post(format!("{base}/execute"))
        .json(&json!({"task": "Get weather in Tokyo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let task_id = body["task_id"].as_str().unwrap();
    let fetched: Value = http
        .get(format!("{base}/tasks/{task_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["status"], "failed");
    assert_eq!(fetched["error"], body["error"]);
}

#[tokio::test]
async fn unknown_task_is_404() {
    let (base, _llm, _apis) = offline_gateway().await;
    let response = client()
        .get(format!("{base}/tasks/deadbeef"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"detail": "Task not found"}));
}

#[tokio::test]
async fn blank_or_malformed_requests_are_rejected() {
    let (base, _llm, _apis) = offline_gateway().await;
    let http = client();

    let blank = http
        .post(format!("{base}/execute"))
        .json(&json!({"task": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let missing = http
        .post(format!("{base}/execute"))
        .json(&json!({"max_steps": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let (base, _llm, _apis) = offline_gateway().await;
    let task = "x".repeat(70_000);
    let response = client()
        .post(format!("{base}/execute"))
        .json(&json!({ "task": task }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
