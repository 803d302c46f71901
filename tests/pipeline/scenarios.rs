use crate::harness::{
    install_crypto, mount_formatting, mount_plan, search_body, test_config, weather_body,
};
use opsassist::pipeline::Pipeline;
use opsassist::verifier::ReportStatus;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn weather_and_search_plan_runs_end_to_end() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;

    mount_plan(
        &llm,
        &json!({
            "task": "weather and repos",
            "steps": [
                {"step_number": 1, "description": "Weather in Tokyo", "tool": "weather",
                 "parameters": {"city": "Tokyo", "operation": "current"}},
                {"step_number": 2, "description": "Rust repos", "tool": "github_search",
                 "parameters": {"query": "rust", "per_page": 2}}
            ]
        }),
    )
    .await;
    mount_formatting(
        &llm,
        &json!({
            "summary": "Tokyo is clear; two Rust repositories found",
            "data": {"weather": {"city": "Tokyo"}},
            "details": ["Clear, 21.5C", "tokio", "serde"],
            "status": "success",
            "notes": ""
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Tokyo", "Japan")))
        .expect(1)
        .mount(&apis)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "rust"))
        .and(query_param("per_page", "2"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["tokio", "serde"])))
        .expect(1)
        .mount(&apis)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline
        .run("Weather in Tokyo and popular rust repositories", None)
        .await
        .unwrap();

    assert_eq!(run.plan.task, "Weather in Tokyo and popular rust repositories");
    assert_eq!(run.plan.len(), 2);
    assert!(run.plan.steps[0].parameters.get("operation").is_none());

    assert_eq!(run.execution_results.len(), 2);
    assert_eq!(run.execution_results[0].step, 1);
    let weather = run.execution_results[0].result.as_ref().unwrap();
    assert_eq!(weather["city"], "Tokyo");
    assert_eq!(weather["country"], "Japan");
    let search = run.execution_results[1].result.as_ref().unwrap();
    assert_eq!(search["repositories"].as_array().unwrap().len(), 2);
    assert_eq!(search["repositories"][0]["name"], "org/tokio");

    assert_eq!(run.final_result.status, ReportStatus::Success);
    assert!(run.final_result.failed_steps.is_empty());
    let formatted = run.final_result.formatted_result.unwrap();
    assert_eq!(formatted.details.len(), 3);
    assert!(formatted.summary.contains("Tokyo"));
}

#[tokio::test]
async fn unknown_tool_in_plan_makes_report_partial() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;

    mount_plan(
        &llm,
        &json!({
            "task": "t",
            "steps": [
                {"step_number": 1, "description": "Weather", "tool": "weather",
                 "parameters": {"city": "Oslo"}},
                {"step_number": 2, "description": "Quote", "tool": "stock_quote",
                 "parameters": {"symbol": "ACME"}}
            ]
        }),
    )
    .await;
    mount_formatting(&llm, &json!({"summary": "Oslo weather only", "status": "partial"})).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Oslo", "Norway")))
        .mount(&apis)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("Weather in Oslo and ACME stock", None).await.unwrap();

    assert_eq!(run.final_result.status, ReportStatus::Partial);
    assert_eq!(run.final_result.failed_steps.len(), 1);
    let failed = &run.final_result.failed_steps[0];
    assert_eq!(failed.step, 2);
    assert!(failed.result.is_none());
    assert!(failed.error.as_deref().unwrap().contains("stock_quote"));
    assert_eq!(
        run.final_result.formatted_result.unwrap().summary,
        "Oslo weather only"
    );
}

#[tokio::test]
async fn all_steps_failing_skips_formatting() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;

    mount_plan(
        &llm,
        &json!({"task": "t", "steps": [{"step_number": 1, "tool": "stock_quote"}]}),
    )
    .await;
    Mock::given(method("POST"))
        .and(wiremock::matchers::body_string_contains(
            crate::harness::VERIFICATION_MARKER,
        ))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&llm)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("ACME stock price", None).await.unwrap();

    assert_eq!(run.final_result.status, ReportStatus::Failed);
    assert!(run.final_result.formatted_result.is_none());
    assert_eq!(run.final_result.failed_steps.len(), 1);
}

#[tokio::test]
async fn max_steps_limits_execution() {
    install_crypto();
    let llm = MockServer::start().await;
    let apis = MockServer::start().await;

    mount_plan(
        &llm,
        &json!({"task": "t", "steps": [
            {"step_number": 1, "tool": "weather", "parameters": {"city": "Rome"}},
            {"step_number": 2, "tool": "weather", "parameters": {"city": "Lima"}}
        ]}),
    )
    .await;
    mount_formatting(&llm, &json!({"summary": "Rome"})).await;
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Rome", "Italy")))
        .expect(1)
        .mount(&apis)
        .await;

    let pipeline = Pipeline::from_config(&test_config(&llm, &apis)).unwrap();
    let run = pipeline.run("Weather in Rome and Lima", Some(1)).await.unwrap();
    assert_eq!(run.plan.len(), 1);
    assert_eq!(run.execution_results.len(), 1);
}
