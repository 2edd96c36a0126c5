//! Upstream completion API access

mod client;
mod openai;

pub use client::build_http_client;
pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::api::{ChatCompletionRequest, ResponsesRequest};

/// Text produced by one upstream call
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Provider-reported token counts, normalized across API surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Everything that can go wrong talking to upstream
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to reach upstream: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Upstream response contained no completion text")]
    EmptyReply,
}

/// One blocking-per-request completion call against an upstream API
#[async_trait]
pub trait Completer: Send + Sync {
    /// POST `/chat/completions`; reply is the first choice's message content
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Completion, UpstreamError>;

    /// POST `/responses`; reply is the aggregated `output_text`
    async fn create_response(&self, request: &ResponsesRequest) -> Result<Completion, UpstreamError>;
}
