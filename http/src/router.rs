use crate::metrics::handler;
use axum::{
    routing::get,
    Router,
};
use fritzbox_exporter_collector::Orchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState { orchestrator };

    Router::new()
        .route("/metrics", get(handler))
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "OK"
}

async fn index() -> &'static str {
    "Use /metrics"
}
