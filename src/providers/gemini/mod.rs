//! Gemini 模型客户端
//!
//! 通过 `generateContent` 接口发送单轮文本请求，API 密钥放在请求头中

mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{header, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;

use crate::providers::ModelClient;
use types::{GenerateContentRequest, GenerateContentResponse};

/// API 密钥请求头
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini 客户端配置
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct GeminiClient {
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chatbot-service/", env!("CARGO_PKG_VERSION")))
            .default_headers(build_headers(&config.api_key)?)
            .build()
            .context("Failed to create Gemini HTTP client")?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            model: config.model,
            endpoint,
            client,
        })
    }
}

fn build_headers(api_key: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key).context("Invalid API key for header")?;
    key.set_sensitive(true);
    map.insert(API_KEY_HEADER, key);

    map.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    Ok(map)
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, error_body);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        body.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_base: format!("{}/v1beta", server.uri()),
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout,
        })
        .unwrap()
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_prompt_with_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "¿Qué fruta es de temporada?"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("Las fresas.")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let text = client.generate("¿Qué fruta es de temporada?").await.unwrap();

        assert_eq!(text, "Las fresas.");
    }

    #[tokio::test]
    async fn api_key_stays_out_of_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
            .mount(&server)
            .await;

        client_for(&server, Duration::from_secs(5))
            .generate("hola")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].url.as_str().contains("test-key"));
    }

    #[tokio::test]
    async fn error_status_keeps_upstream_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("API key not valid. Please pass a valid API key."),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_secs(5))
            .generate("hola")
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("400"));
        assert!(message.contains("API key not valid"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server, Duration::from_secs(5))
            .generate("hola")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn slow_upstream_hits_client_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply("tarde"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server, Duration::from_millis(100))
            .generate("hola")
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn invalid_api_key_characters_fail_construction() {
        let result = GeminiClient::new(GeminiConfig {
            api_base: "http://localhost".to_string(),
            api_key: "bad\nkey".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(1),
        });

        assert!(result.is_err());
    }
}
