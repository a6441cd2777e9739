//! Test 命令 - 发送测试请求到本地服务器
//!
//! 用于验证本地运行的聊天服务是否正常工作。

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::Config;

/// 默认测试消息
pub const DEFAULT_TEST_MESSAGE: &str = "Hola FrescoBot, ¿qué frutas me recomiendas hoy?";

/// 执行测试命令
///
/// 向 `/api/v1/chat` 发送一条消息，显示响应状态和内容；
/// 非 2xx 响应视为失败
pub async fn test_command(config: Config, message: String) -> Result<()> {
    println!("Sending test request to local server...");

    let url = format!("{}/api/v1/chat", config.local_url());
    println!("Request URL: {}", url);

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout + Duration::from_secs(5))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .post(&url)
        .json(&serde_json::json!({ "message": message }))
        .send()
        .await
        .context("Request failed. Make sure the server is running.")?;

    let status = response.status();
    println!("Response status: {}", status);

    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("Request failed: {}", body);
    }

    println!("Response:");
    println!("{}", body);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let vars = HashMap::from([
            ("CHATBOT_HOST".to_string(), "127.0.0.1".to_string()),
            ("CHATBOT_PORT".to_string(), server.address().port().to_string()),
        ]);
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn posts_message_to_chat_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .and(body_json(json!({"message": "hola"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "¡Hola!"})))
            .expect(1)
            .mount(&server)
            .await;

        tokio_test::assert_ok!(test_command(config_for(&server), "hola".to_string()).await);
    }

    #[tokio::test]
    async fn error_status_fails_the_command() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({"detail": "Servicio de IA no disponible."})),
            )
            .mount(&server)
            .await;

        let err = test_command(config_for(&server), "hola".to_string())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Servicio de IA no disponible."));
    }
}
