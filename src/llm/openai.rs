//! OpenAI 兼容的 Chat Completions 客户端
//!
//! 适配任何实现 OpenAI Chat Completions API 的服务端
//! （官方接口、本地模型网关或自建代理）。

use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::llm::{ChatClient, ChatMessage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI 兼容客户端
pub struct OpenAiChatClient {
    client: Client,
    config: ModelConfig,
}

/// Chat Completions 请求体
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat Completions 响应体
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiChatClient {
    /// 创建客户端
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| AppError::Llm(format!("构建 HTTP 客户端失败: {e}")))?;

        Ok(Self { client, config })
    }

    /// 拼接 API 地址，统一追加 `/v1/{path}`，避免 base_url 自带 `/v1` 时重复
    fn api_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{}/v1/{}", base, path.trim_start_matches('/'))
    }

    /// 为请求附加 Authorization 头（密钥为空时不附加）
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            request
        } else {
            request.header("Authorization", format!("Bearer {}", self.config.api_key))
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let url = self.api_url("chat/completions");
        let body = CompletionRequest {
            model: &self.config.chat_model,
            messages,
            temperature,
            max_tokens,
        };

        tracing::debug!("请求模型补全: {} model={}", url, self.config.chat_model);

        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let request = self.add_auth_header(request);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("请求发送失败: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::Llm(format!("读取响应失败: {e}")))?;

        if !status.is_success() {
            let snippet: String = response_text.chars().take(200).collect();
            return Err(AppError::Llm(format!("HTTP {status}: {snippet}")));
        }

        let completion: CompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| AppError::Llm(format!("响应解析失败: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("响应内容为空".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> ModelConfig {
        ModelConfig {
            chat_model: "test-model".into(),
            base_url: base_url.into(),
            api_key: "sk-test".into(),
            temperature: 0.3,
            max_tokens: 1024,
            request_timeout: 5,
        }
    }

    #[test]
    fn test_api_url_normalization() {
        let client = OpenAiChatClient::new(config("http://localhost:9999/v1/")).unwrap();
        assert_eq!(
            client.api_url("chat/completions"),
            "http://localhost:9999/v1/chat/completions"
        );

        let client = OpenAiChatClient::new(config("http://localhost:9999")).unwrap();
        assert_eq!(
            client.api_url("chat/completions"),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"openness\": 70}"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri())).unwrap();
        let content = client
            .complete(&[ChatMessage::user("测试")], 0.3, 1024)
            .await
            .unwrap();

        assert_eq!(content, "{\"openness\": 70}");
    }

    #[tokio::test]
    async fn test_complete_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri())).unwrap();
        let err = client
            .complete(&[ChatMessage::user("测试")], 0.3, 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_complete_empty_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri())).unwrap();
        let err = client
            .complete(&[ChatMessage::user("测试")], 0.3, 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
    }
}
