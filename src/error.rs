//! 网关错误类型
//!
//! 所有失败都在处理器边界转换为 `{"detail": ...}` 响应，
//! 状态码统一由 [`GatewayError::status`] 决定。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const UNAVAILABLE_DETAIL: &str = "Servicio de IA no disponible.";
pub const UPSTREAM_DETAIL: &str = "Error al comunicarse con la API de IA.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("GOOGLE_API_KEY is missing or empty")]
    ConfigMissing,

    #[error("failed to initialize model client: {0:#}")]
    ClientInit(#[source] anyhow::Error),

    #[error("no model client available")]
    ClientUnavailable,

    #[error("model call failed: {0:#}")]
    UpstreamFailure(#[source] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ConfigMissing | Self::ClientInit(_) | Self::ClientUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的文本，不包含内部错误细节
    fn detail(&self) -> String {
        match self {
            Self::InvalidRequest(detail) => detail.clone(),
            Self::ConfigMissing | Self::ClientInit(_) | Self::ClientUnavailable => {
                UNAVAILABLE_DETAIL.to_string()
            }
            Self::UpstreamFailure(_) => UPSTREAM_DETAIL.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
