//! Serve 命令 - 启动 API 服务器

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// # 功能
///
/// - 初始化模型客户端（缺少 API 密钥时以降级模式继续启动）
/// - 初始化 HTTP 路由、CORS 和指标中间件
/// - 启动服务器并等待关闭信号（Ctrl+C 或 SIGTERM）
pub async fn serve_command(config: Config) -> Result<()> {
    tracing::debug!(?config, "loaded configuration");
    gateway::serve(config).await
}
