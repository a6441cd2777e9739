//! 模型客户端抽象层
//!
//! 定义远端生成模型的统一接口，并在启动时根据配置构造唯一的客户端实例

pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::GatewayError;
use gemini::{GeminiClient, GeminiConfig};

/// ModelClient Trait - 远端生成模型的统一接口
///
/// 启动时构造一次，之后在所有请求间只读共享
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// 绑定的模型名称（用于日志）
    fn model(&self) -> &str;

    /// 发送一次生成请求，返回模型回复的纯文本
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 根据配置构造模型客户端
///
/// # 错误
///
/// - `ConfigMissing`: 未配置或配置了空的 API 密钥
/// - `ClientInit`: HTTP 客户端构造失败
pub fn init_model_client(config: &Config) -> Result<Arc<dyn ModelClient>, GatewayError> {
    let api_key = config.api_key().ok_or(GatewayError::ConfigMissing)?;

    let client = GeminiClient::new(GeminiConfig {
        api_base: config.api_base.clone(),
        api_key: api_key.to_string(),
        model: config.model.clone(),
        timeout: config.upstream_timeout,
    })
    .map_err(GatewayError::ClientInit)?;

    Ok(Arc::new(client))
}

/// 启动时加载模型客户端
///
/// 失败时不会中断启动：记录错误并返回 `None`，聊天接口随后返回 503
pub fn load_model_client(config: &Config) -> Option<Arc<dyn ModelClient>> {
    match init_model_client(config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Model client configured and ready");
            Some(client)
        }
        Err(e) => {
            tracing::error!("Model client unavailable, chat endpoint disabled: {e:#}");
            None
        }
    }
}
