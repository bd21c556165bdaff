use crate::{
    error::AppError,
    router::AppState,
};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use fritzbox_exporter_collector::metrics::CONTENT_TYPE;

/// Runs a scrape cycle, unless throttled, and answers with the whole registry.
///
/// Failed cycles still answer 200. Their outcome is visible in the exporter's own metrics.
pub async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if let Some(outcome) = state.orchestrator.collect_throttled().await {
        if !outcome.is_success() {
            debug!(?outcome, "Serving the result of a failed scrape");
        }
    }

    let body = state.orchestrator.metrics().encode()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
