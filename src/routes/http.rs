// GET handlers: collector lists, snapshot, health, version

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use super::AppState;
use super::actions::ApiError;
use crate::version::{NAME, VERSION};

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/health
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/docker/containers: 500 only when docker has failed and never produced a list.
pub(super) async fn list_containers(State(state): State<AppState>) -> Response {
    let slot = state.aggregator.store().containers().await;
    if slot.status.never_succeeded() {
        let message = slot.status.last_error.unwrap_or_default();
        return ApiError::internal(message).into_response();
    }
    Json(slot.items).into_response()
}

pub(super) async fn list_ports(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.store().ports().await.items)
}

pub(super) async fn list_processes(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.store().processes().await.items)
}

/// GET /api/git/repos: dirty repositories first.
pub(super) async fn list_git_repos(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.store().git().await.items)
}

/// GET /api/snapshot: all four collections with per-collector status.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.store().snapshot().await)
}
