use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::{AppState, TaskRequest, TaskResponse, new_task_id};

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "detail": message.into() });
    (status, Json(body)).into_response()
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// POST /execute: run the full pipeline for one task
pub(super) async fn handle_execute(
    State(state): State<AppState>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => {
            return detail(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {e}. Expected: {{\"task\": \"...\"}}"),
            );
        }
    };

    let task = request.task.trim();
    if task.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "Task cannot be empty");
    }

    let task_id = new_task_id();
    let max_steps = request.max_steps.unwrap_or(state.default_max_steps);
    tracing::info!(%task_id, task, max_steps, "Executing task");

    let response = match state.pipeline.run(task, Some(max_steps)).await {
        Ok(run) => TaskResponse::completed(task_id, run),
        Err(e) => {
            tracing::warn!(%task_id, error = %e, "Task failed");
            TaskResponse::failed(task_id, e.to_string())
        }
    };

    state.store.insert(response.clone()).await;
    Json(response).into_response()
}

/// GET /tasks/{id}: fetch a stored task report
pub(super) async fn handle_get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Response {
    match state.store.get(&task_id).await {
        Some(response) => Json(response).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Task not found"),
    }
}
