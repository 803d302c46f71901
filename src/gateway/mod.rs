//! Axum-based HTTP service exposing the pipeline.
//!
//! - `POST /execute` runs a task and stores the report
//! - `GET /tasks/{id}` returns a stored report
//! - `GET /health` is a liveness marker
//!
//! Request bodies are capped at 64KB and every request carries a timeout.

mod handlers;
pub mod store;

pub use store::TaskStore;

use handlers::{handle_execute, handle_get_task, handle_health};

use crate::config::{Config, GatewayConfig};
use crate::executor::StepResult;
use crate::pipeline::{Pipeline, TaskRun};
use crate::planner::Plan;
use crate::verifier::VerificationReport;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout. Covers two model calls plus tool retries.
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<TaskStore>,
    pub default_max_steps: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, config: &GatewayConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store: Arc::new(TaskStore::new(
                Duration::from_secs(config.task_ttl_secs),
                config.max_stored_tasks,
            )),
            default_max_steps: config.default_max_steps,
        }
    }
}

/// `POST /execute` body
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub task: String,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResults {
    pub steps: Vec<StepResult>,
}

/// Response for `POST /execute` and `GET /tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub plan: Option<Plan>,
    pub execution_results: Option<ExecutionResults>,
    pub final_result: Option<VerificationReport>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn completed(task_id: String, run: TaskRun) -> Self {
        Self {
            task_id,
            status: TaskStatus::Completed,
            plan: Some(run.plan),
            execution_results: Some(ExecutionResults {
                steps: run.execution_results,
            }),
            final_result: Some(run.final_result),
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn failed(task_id: String, error: impl Into<String>) -> Self {
        Self {
            task_id,
            status: TaskStatus::Failed,
            plan: None,
            execution_results: None,
            final_result: None,
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }
}

/// Short task id: the first 8 hex characters of a random UUID.
pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/execute", post(handle_execute))
        .route("/tasks/{id}", get(handle_get_task))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();
    let pipeline = Pipeline::from_config(&config)?;
    let state = AppState::new(pipeline, &config.gateway);

    println!("◆ Listening on http://{host}:{actual_port}");
    println!("  POST /execute     → run a task");
    println!("  GET  /tasks/{{id}}  → stored report");
    println!("  GET  /health      → liveness");
    println!("  Press Ctrl+C to stop\n");
    tracing::info!(host, port = actual_port, "Gateway started");

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
