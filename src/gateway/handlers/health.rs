//! 存活与就绪检查处理器

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::gateway::state::AppState;

/// 存活检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

/// GET /
///
/// 只表示进程存活，与模型客户端是否可用无关
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "Chatbot Service",
        status: "ok",
    })
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
}

/// GET /ready
pub async fn handle_ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.is_ready() {
        (StatusCode::OK, Json(ReadyResponse { status: "ready" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "unavailable",
            }),
        )
    }
}
