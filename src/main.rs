//! Chatbot Service - 果蔬市场聊天助手网关
//!
//! 接收用户的聊天消息，套用固定的 FrescoBot 人设提示词，
//! 转发给 Gemini 生成回复。
//!
//! # 接口
//!
//! - `POST /api/v1/chat`: 聊天
//! - `GET /`: 存活检查
//! - `GET /ready`: 就绪检查（模型客户端是否可用）
//! - `GET /metrics`: Prometheus 指标
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod error;
mod gateway;
mod prompt;
mod providers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chatbot Service CLI
#[derive(Parser)]
#[command(name = "chatbot-service")]
#[command(about = "Marketplace chatbot backed by the Gemini API", long_about = None)]
#[command(version)]
struct Cli {
    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动聊天服务
    Serve,
    /// 向本地服务器发送测试请求
    Test {
        /// 测试消息内容
        #[arg(short, long, default_value = commands::test::DEFAULT_TEST_MESSAGE)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("CHATBOT_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { message } => commands::test_command(config, message).await,
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chatbot_service=info".into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    }
}
