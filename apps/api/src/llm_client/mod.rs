//! LLM Client: the single point of entry for all model calls in the service.
//!
//! No other module may call the completion API directly. Handlers receive an
//! `Arc<dyn CompletionService>` through `AppState`, which lets tests swap in a stub.
//!
//! The model is asked for structured output (`response_format = json_object`)
//! and the returned message content is handed back as a JSON string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A single system + user exchange sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub user: &'a str,
}

/// Backend-agnostic completion contract.
///
/// Implementations return the raw JSON text produced by the model, with any
/// markdown fences already removed.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete_json(&self, completion: Completion<'_>) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

impl dyn CompletionService + '_ {
    /// Calls the model and deserializes the response text.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        completion: Completion<'_>,
    ) -> Result<T, LlmError> {
        let text = self.complete_json(completion).await?;
        serde_json::from_str(&text).map_err(LlmError::Parse)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat Completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Makes a single call to the Chat Completions API and returns the full response.
    /// Failures are reported immediately; there is no retry.
    pub async fn call(&self, completion: Completion<'_>) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: completion.system,
                },
                ChatMessage {
                    role: "user",
                    content: completion.user,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                self.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete_json(&self, completion: Completion<'_>) -> Result<String, LlmError> {
        let response = self.call(completion).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(strip_json_fences(text).to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::StubCompletion;
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_chat_request_asks_for_json_object() {
        let request = ChatRequest {
            model: "gpt-4.1-mini",
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_chat_response_text_skips_blank_content() {
        let json = r#"{"choices": [{"message": {"content": "   "}}], "usage": null}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());

        let json = r#"{"choices": [{"message": {"content": "{\"a\":1}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_call_json_decodes_stub_reply() {
        let stub: Arc<dyn CompletionService> =
            Arc::new(StubCompletion::replying("```json\n{\"score\": 7}\n```"));
        let value: serde_json::Value = stub
            .call_json(Completion {
                system: "s",
                user: "u",
            })
            .await
            .unwrap();
        assert_eq!(value["score"], 7);
    }

    #[tokio::test]
    async fn test_call_json_reports_parse_failure() {
        let stub: Arc<dyn CompletionService> = Arc::new(StubCompletion::replying("not json"));
        let result: Result<serde_json::Value, _> = stub
            .call_json(Completion {
                system: "s",
                user: "u",
            })
            .await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }
}
