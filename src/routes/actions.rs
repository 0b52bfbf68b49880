// POST handlers and the log tail: everything that goes through the dispatcher

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::AppState;
use crate::error::ActionError;

/// `{ "error": "<message>" }` with a status code.
pub(super) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(super) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ActionError> for ApiError {
    fn from(e: ActionError) -> Self {
        let status = match e {
            ActionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ActionError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn success() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

pub(super) async fn start_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.dispatcher.start_container(&id).await?;
    Ok(success())
}

pub(super) async fn stop_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.dispatcher.stop_container(&id).await?;
    Ok(success())
}

pub(super) async fn restart_container(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.dispatcher.restart_container(&id).await?;
    Ok(success())
}

/// GET /api/docker/containers/{id}/logs: last 100 lines.
pub(super) async fn container_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = state.dispatcher.container_logs(&id).await?;
    Ok(Json(json!({ "logs": logs })))
}

/// POST /api/processes/{pid}/stop: 400 for a bad pid, 500 when kill fails.
pub(super) async fn stop_process(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.dispatcher.stop_process(&pid).await?;
    Ok(success())
}

/// POST /api/refresh: refreshes every collector and returns the new snapshot.
pub(super) async fn refresh_all(State(state): State<AppState>) -> impl IntoResponse {
    state.aggregator.refresh_all().await;
    Json(state.aggregator.store().snapshot().await)
}
