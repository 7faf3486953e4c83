//! API request handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use spindle_core::{StatusCounts, TaskId, TaskRecord};
use tracing::{debug, error};

use super::ApiState;
use super::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /tasks`: store a pending record and hand it to the pool.
pub async fn create_task(
    State(state): State<ApiState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        debug!("rejected create request: {rejection}");
        ApiError::BadRequest("invalid request body".to_string())
    })?;

    let payload = body
        .payload
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("payload is required".to_string()))?;

    let record = state.store.insert(payload).await;
    if let Err(err) = state.pool.submit(record.clone()).await {
        // record は登録済みだが worker には渡らない。pending のまま残る
        error!(task_id = %record.id, "task stored but not dispatched: {err}");
        return Err(err.into());
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /tasks`
pub async fn list_tasks(State(state): State<ApiState>) -> Json<Vec<TaskRecord>> {
    Json(state.store.list().await)
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError> {
    // 形式が不正な id は「発行されていない id」と同じ扱い
    let task_id: TaskId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("task {id} not found")))?;

    let record = state.store.get(task_id).await?;
    Ok(Json(record))
}

/// `GET /stats`
pub async fn stats(State(state): State<ApiState>) -> Json<StatusCounts> {
    Json(state.store.counts().await)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("not found".to_string())
}
