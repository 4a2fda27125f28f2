//! OpenAI-compatible chat completions client.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LlmClient, LlmError};

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// `api_url` is the API base, e.g. `https://api.openai.com/v1`.
    /// Without an `api_key` every call fails with `LlmError::NotConfigured`.
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            user: &request.session_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No content in completion".to_string()))
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::NotConfigured)?;
        let url = format!("{}/chat/completions", self.api_url);

        tracing::debug!(
            session_id = %request.session_id,
            model = %self.model,
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        body.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            session_id: "bio-123".to_string(),
            system: "You write bios.".to_string(),
            prompt: "Write one.".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let client = OpenAiClient::new(
            "https://api.example.com/v1/",
            Some("key".to_string()),
            "gpt-4o",
            Duration::from_secs(5),
        );
        let request = request();
        let body = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["user"], "bio-123");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Write one.");
        assert_eq!(client.api_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_response_text_is_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "jazz, tap" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "jazz, tap");
    }

    #[test]
    fn test_empty_choices_is_invalid_response() {
        let response: ChatResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let client = OpenAiClient::new("http://127.0.0.1:1", None, "gpt-4o", Duration::from_secs(1));
        assert!(!client.is_configured());
        assert!(matches!(
            client.complete(request()).await,
            Err(LlmError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        let client = OpenAiClient::new(
            "http://127.0.0.1:1",
            Some("key".to_string()),
            "gpt-4o",
            Duration::from_secs(2),
        );
        let result = client.complete(request()).await;
        assert!(matches!(
            result,
            Err(LlmError::Connection(_)) | Err(LlmError::Timeout)
        ));
    }
}
