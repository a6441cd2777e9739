//! HTTP 请求处理器

pub mod chat;
pub mod health;
pub mod metrics;

pub use chat::handle_chat;
pub use health::{handle_health, handle_ready};
pub use metrics::handle_metrics;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// JSON 提取器/响应
///
/// 缺少 `Content-Type` 时按 JSON 解析；任何请求体错误都转换为
/// `GatewayError::InvalidRequest`（422）
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(GatewayError::InvalidRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

        serde_json::from_slice(&bytes).map(AppJson).map_err(|e| {
            GatewayError::InvalidRequest(format!("Failed to parse the request body: {e}"))
        })
    }
}

/// 未声明 `Content-Type` 或声明为 `application/json` / `*+json`
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };

    let Ok(value) = value.to_str() else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

impl<T> IntoResponse for AppJson<T>
where
    Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}
