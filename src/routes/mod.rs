// HTTP routes: read endpoints serve the snapshot store, action endpoints go through the dispatcher

mod actions;
mod http;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::aggregator::Aggregator;
use crate::dispatcher::Dispatcher;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) dispatcher: Arc<Dispatcher>,
}

/// Builds the router. CORS admits exactly `allowed_origin`.
pub fn app(
    aggregator: Arc<Aggregator>,
    dispatcher: Arc<Dispatcher>,
    allowed_origin: &str,
) -> anyhow::Result<Router> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("server.allowed_origin {:?}: {}", allowed_origin, e))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let state = AppState {
        aggregator,
        dispatcher,
    };
    let api = Router::new()
        .route("/docker/containers", get(http::list_containers))
        .route("/docker/containers/{id}/start", post(actions::start_container))
        .route("/docker/containers/{id}/stop", post(actions::stop_container))
        .route("/docker/containers/{id}/restart", post(actions::restart_container))
        .route("/docker/containers/{id}/logs", get(actions::container_logs))
        .route("/ports", get(http::list_ports))
        .route("/processes", get(http::list_processes))
        .route("/processes/{pid}/stop", post(actions::stop_process))
        .route("/git/repos", get(http::list_git_repos))
        .route("/health", get(http::health_handler))
        .route("/snapshot", get(http::snapshot_handler))
        .route("/refresh", post(actions::refresh_all));

    Ok(Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .nest("/api", api)
        .layer(cors)
        .with_state(state))
}
