//! Prometheus 指标处理器

use axum::{extract::State, http::header, response::IntoResponse};

use crate::gateway::state::AppState;

/// GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics().render(),
    )
}
