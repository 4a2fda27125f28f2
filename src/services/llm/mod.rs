//! Language model client abstraction.
//!
//! The enrichment pipeline talks to the model through [`LlmClient`] so the
//! transport can be swapped (OpenAI-compatible HTTP in production, stubs in
//! tests).

use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

/// A one-shot completion: a system instruction plus a single user prompt.
///
/// `session_id` identifies the call for tracing and provider-side
/// attribution. Sessions are never resumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub session_id: String,
    pub system: String,
    pub prompt: String,
}

/// Errors that can occur when calling the model service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Model service is not configured")]
    NotConfigured,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

/// Stateless text-completion service.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Runs one completion and returns the raw response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
