use crate::harness::{install_crypto, mount_llm_outage, search_body, test_config, weather_body};
use opsassist::config::LlmErrorPolicy;
use opsassist::error::OpsError;
use opsassist::pipeline::Pipeline;
use opsassist::verifier::ReportStatus;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn model_outage_uses_pattern_plan_and_local_formatting() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Tokyo", "Japan")))
        .expect(1)
        .mount(&apis)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("Get weather in Tokyo", None).await.unwrap();

    assert_eq!(run.plan.len(), 1);
    assert_eq!(run.plan.steps[0].tool, "weather");
    assert_eq!(
        serde_json::Value::Object(run.plan.steps[0].parameters.clone()),
        json!({"city": "Tokyo"})
    );

    assert_eq!(run.final_result.status, ReportStatus::Success);
    let formatted = run.final_result.formatted_result.unwrap();
    assert_eq!(formatted.data["step_1"]["city"], "Tokyo");
    assert!(formatted.summary.starts_with("1 of 1"));
    assert!(!formatted.notes.is_empty());
}

#[tokio::test]
async fn model_outage_plans_repository_search_from_patterns() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "python"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["django", "flask"])))
        .expect(1)
        .mount(&apis)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("Find python repositories", None).await.unwrap();

    assert_eq!(run.plan.steps[0].tool, "github_search");
    assert_eq!(
        serde_json::Value::Object(run.plan.steps[0].parameters.clone()),
        json!({"query": "python", "per_page": 5})
    );
    let result = run.execution_results[0].result.as_ref().unwrap();
    assert_eq!(result["total_count"], 2);
    assert_eq!(result["repositories"][1]["name"], "org/flask");
}

#[tokio::test]
async fn weather_api_down_returns_error_mapping_after_retries() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&apis)
        .await;

    let config = test_config(&llm, &apis);
    assert_eq!(config.tools.max_retries, 3);
    let pipeline = Pipeline::from_config(&config).unwrap();
    let run = pipeline.run("Get weather in Tokyo", None).await.unwrap();

    let step = &run.execution_results[0];
    assert!(step.success);
    let result = step.result.as_ref().unwrap();
    assert_eq!(result["city"], "Tokyo");
    assert!(result["error"].as_str().unwrap().contains("3 attempts"));
}

#[tokio::test]
async fn unrelated_task_without_model_has_empty_plan() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;
    mount_llm_outage(&llm).await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("Tell me a joke", None).await.unwrap();

    assert!(run.plan.is_empty());
    assert!(run.execution_results.is_empty());
    assert_eq!(run.final_result.status, ReportStatus::Success);
    assert!(run.final_result.formatted_result.is_some());
}

#[tokio::test]
async fn propagate_policy_fails_the_run() {
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
    let pipeline = Pipeline::from_config(&config).unwrap();

    let err = pipeline.run("Get weather in Tokyo", None).await.unwrap_err();
    assert!(matches!(err, OpsError::Verify(_)));
}
