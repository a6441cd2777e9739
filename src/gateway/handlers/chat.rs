//! Chat API 处理器

use axum::extract::State;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::gateway::{handlers::AppJson, state::AppState};
use crate::prompt::build_prompt;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /api/v1/chat 处理器
///
/// 请求体校验在提取阶段完成，校验失败时不会调用模型
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<AppJson<ChatReply>, GatewayError> {
    let model = state.model().ok_or_else(|| {
        tracing::warn!("chat request rejected: no model client");
        GatewayError::ClientUnavailable
    })?;

    let prompt = build_prompt(&request.message);

    tracing::info!(
        model = model.model(),
        message_len = request.message.len(),
        "request"
    );

    match model.generate(&prompt).await {
        Ok(reply) => {
            counter!("chat_upstream_requests_total", "outcome" => "success").increment(1);
            tracing::info!(reply_len = reply.len(), "response");
            Ok(AppJson(ChatReply { reply }))
        }
        Err(err) => {
            counter!("chat_upstream_requests_total", "outcome" => "failure").increment(1);
            tracing::error!("Error generating reply from model: {err:#}");
            Err(GatewayError::UpstreamFailure(err))
        }
    }
}
