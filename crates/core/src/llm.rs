//! Text-completion collaborator.
//!
//! The enrichment adapter only ever needs "strings in, string out", so the language model sits
//! behind [`LlmClient`]. [`HttpLlmClient`] speaks the OpenAI-compatible chat-completions API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LLM_ENDPOINT};

/// One completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl LlmClient for Arc<dyn LlmClient> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        (**self).complete(request).await
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    Http(String),
    #[error("response error: {0}")]
    Response(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Connection settings for [`HttpLlmClient`].
#[derive(Debug, Clone)]
pub struct HttpLlmClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl HttpLlmClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct HttpLlmClient {
    client: reqwest::Client,
    config: HttpLlmClientConfig,
}

impl HttpLlmClient {
    pub fn new(config: HttpLlmClientConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|e| LlmError::Http(e.to_string()))?,
        );
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl ChatRequest {
    fn from_completion(request: CompletionRequest) -> Self {
        Self {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// First choice's message content, or a response error.
fn first_choice(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Serialization(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::Response("missing choices".to_string()))
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let headers = self.headers()?;
        let body = ChatRequest::from_completion(request);

        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::Response(format!("HTTP {status}: {text}")));
        }

        tracing::debug!(bytes = text.len(), "chat completion received");
        first_choice(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_carries_both_messages_and_limits() {
        let request = CompletionRequest {
            system: "sys".into(),
            user: "usr".into(),
            model: "gpt-4o".into(),
            temperature: 0.4,
            max_tokens: 300,
        };
        let json = serde_json::to_value(ChatRequest::from_completion(request)).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn first_choice_extracts_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Defend in place."}}]}"#;
        assert_eq!(first_choice(body).unwrap(), "Defend in place.");
    }

    #[test]
    fn empty_choices_is_a_response_error() {
        assert!(matches!(
            first_choice(r#"{"choices":[]}"#),
            Err(LlmError::Response(_))
        ));
        assert!(matches!(
            first_choice(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::Response(_))
        ));
    }

    #[test]
    fn malformed_body_is_a_serialization_error() {
        assert!(matches!(
            first_choice("<html>"),
            Err(LlmError::Serialization(_))
        ));
    }

    #[test]
    fn config_defaults_to_openai_endpoint() {
        let config = HttpLlmClientConfig::new("sk-test");
        assert_eq!(config.endpoint, DEFAULT_LLM_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert!(HttpLlmClient::new(config).is_ok());
    }
}
