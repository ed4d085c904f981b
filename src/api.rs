// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::tasks::{
    GenerateRequest, NotFound, RunnerStatus, ScanRequest, Task, TaskOutcome, TaskRunner,
};

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<TaskRunner>,
}

impl AppState {
    pub fn new(runner: TaskRunner) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/status", get(status))
        .route("/scan", post(scan))
        .route("/generate", post(generate))
        .route("/approve/{index}", post(approve))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Maps runner errors onto HTTP: lookups that miss are 404, everything else 500.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = if self.0.downcast_ref::<NotFound>().is_some() {
            StatusCode::NOT_FOUND
        } else {
            tracing::error!(target: "api", error = ?self.0, "task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(json!({ "status": "error", "message": self.0.to_string() }));
        (code, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn status(State(state): State<AppState>) -> ApiResult<RunnerStatus> {
    Ok(Json(state.runner.status()?))
}

async fn scan(
    State(state): State<AppState>,
    body: Option<Json<ScanRequest>>,
) -> ApiResult<TaskOutcome> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    tracing::info!(
        target: "api",
        inline = req.ideas.as_ref().map(Vec::len),
        "scan requested"
    );
    Ok(Json(state.runner.run(Task::Scan(req)).await?))
}

async fn generate(
    State(state): State<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> ApiResult<TaskOutcome> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    tracing::info!(target: "api", mode = %req.mode, "generate requested");
    Ok(Json(state.runner.run(Task::Generate(req)).await?))
}

async fn approve(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<TaskOutcome> {
    Ok(Json(state.runner.run(Task::Approve { index }).await?))
}
