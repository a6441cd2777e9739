//! 应用配置模块
//!
//! 配置按以下顺序叠加（后者覆盖前者）：
//! 1. 内置默认值
//! 2. 可选的 TOML 配置文件（路径由 `CHATBOT_CONFIG` 指定）
//! 3. 环境变量
//!
//! `GOOGLE_API_KEY` 缺失不会导致启动失败，服务会以降级模式运行。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// 应用配置
#[derive(Clone)]
pub struct Config {
    /// 服务器监听地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Gemini API 密钥，缺失时聊天接口不可用
    pub api_key: Option<String>,
    /// 使用的模型名称
    pub model: String,
    /// Gemini API 基础地址（测试时可指向本地 mock 服务）
    pub api_base: String,
    /// 单次上游调用超时
    pub upstream_timeout: Duration,
    /// 服务端整体请求超时
    pub request_timeout: Duration,
    /// CORS 允许的来源
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// TOML 文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
    model: Option<String>,
    api_base: Option<String>,
    upstream_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    cors_origins: Option<Vec<String>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

impl Config {
    /// 从环境变量（以及可选的配置文件）加载配置
    ///
    /// # 环境变量
    ///
    /// - `GOOGLE_API_KEY`: Gemini API 密钥（可选，缺失时进入降级模式）
    /// - `CHATBOT_HOST` / `CHATBOT_PORT`: 监听地址与端口（默认 0.0.0.0:8000）
    /// - `CHATBOT_MODEL`: 模型名称（默认 gemini-1.5-flash）
    /// - `CHATBOT_API_BASE`: Gemini API 基础地址
    /// - `CHATBOT_UPSTREAM_TIMEOUT_SECS`: 上游调用超时（默认 30）
    /// - `CHATBOT_REQUEST_TIMEOUT_SECS`: 请求整体超时（默认 60）
    /// - `CHATBOT_CORS_ORIGINS`: 逗号分隔的 CORS 来源列表
    /// - `CHATBOT_CONFIG`: TOML 配置文件路径
    ///
    /// # 错误
    ///
    /// - 数值类变量无法解析
    /// - 配置文件无法读取或格式错误
    /// - 超时为零，或整体请求超时不大于上游超时
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用自定义的变量查找函数加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup("CHATBOT_CONFIG") {
            Some(path) => FileConfig::load(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let host = lookup("CHATBOT_HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = parse_var(&lookup, "CHATBOT_PORT")?
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let api_key = lookup("GOOGLE_API_KEY").or(file.api_key);

        let model = lookup("CHATBOT_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base = lookup("CHATBOT_API_BASE")
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let upstream_timeout_secs = parse_var(&lookup, "CHATBOT_UPSTREAM_TIMEOUT_SECS")?
            .or(file.upstream_timeout_secs)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        let request_timeout_secs = parse_var(&lookup, "CHATBOT_REQUEST_TIMEOUT_SECS")?
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        validate_timeouts(upstream_timeout_secs, request_timeout_secs)?;

        let cors_origins = lookup("CHATBOT_CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .or(file.cors_origins)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            host,
            port,
            api_key,
            model,
            api_base,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            cors_origins,
        })
    }

    /// 返回非空的 API 密钥
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// 本地访问服务时使用的基础 URL
    ///
    /// 监听 0.0.0.0 时改用 127.0.0.1
    pub fn local_url(&self) -> String {
        let host = if self.host == "0.0.0.0" {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };
        format!("http://{}:{}", host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a valid number, got {raw:?}"))
        })
        .transpose()
}

/// 两个超时均不为零，且上游超时严格短于整体请求超时
fn validate_timeouts(upstream_secs: u64, request_secs: u64) -> Result<()> {
    anyhow::ensure!(
        upstream_secs > 0,
        "CHATBOT_UPSTREAM_TIMEOUT_SECS must be greater than zero"
    );
    anyhow::ensure!(
        request_secs > 0,
        "CHATBOT_REQUEST_TIMEOUT_SECS must be greater than zero"
    );
    anyhow::ensure!(
        request_secs > upstream_secs,
        "CHATBOT_REQUEST_TIMEOUT_SECS ({request_secs}) must be greater than \
         CHATBOT_UPSTREAM_TIMEOUT_SECS ({upstream_secs})"
    );
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
