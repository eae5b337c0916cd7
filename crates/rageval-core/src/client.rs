use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::JudgeConfig;
use crate::trace::TokenUsage;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("judge endpoint returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid judge response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Raw text returned by the judge model.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// A text-completion service: one system instruction, one user instruction, one reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Completion, JudgeError>;

    /// Model identifier recorded in traces.
    fn model_name(&self) -> &str;
}

/// Client for any endpoint exposing the OpenAI `chat/completions` protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Completion, JudgeError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": temperature,
        });

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(JudgeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        let usage = parsed.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                JudgeError::InvalidResponse("missing choices[0].message.content".into())
            })?;

        Ok(Completion { text, usage })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config_for(server: &mockito::ServerGuard) -> JudgeConfig {
        JudgeConfig {
            base_url: format!("{}/v1/", server.url()),
            model: "judge-test".to_string(),
            ..JudgeConfig::default()
        }
    }

    #[tokio::test]
    async fn sends_chat_request_and_reads_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "judge-test",
                "temperature": 0.0,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"},
                ],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": " 0.8\n"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14},
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = config_for(&server).with_api_key("test-key");
        let client = OpenAiCompatClient::new(&config).unwrap();
        let completion = client.complete("sys", "usr", 0.0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text, " 0.8\n");
        assert_eq!(
            completion.usage,
            Some(TokenUsage {
                input_tokens: 12,
                output_tokens: 2,
                total_tokens: 14,
            })
        );
    }

    #[tokio::test]
    async fn omits_authorization_without_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"1.0"}}]}"#)
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&config_for(&server)).unwrap();
        let completion = client.complete("sys", "usr", 0.0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text, "1.0");
        assert_eq!(completion.usage, None);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&config_for(&server)).unwrap();
        let err = client.complete("sys", "usr", 0.0).await.unwrap_err();
        match err {
            JudgeError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiCompatClient::new(&config_for(&server)).unwrap();
        let err = client.complete("sys", "usr", 0.0).await.unwrap_err();
        assert!(matches!(err, JudgeError::InvalidResponse(_)));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let config = JudgeConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..JudgeConfig::default()
        };
        let client = OpenAiCompatClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model_name(), "Qwen/QwQ-32B-Preview");
    }
}
