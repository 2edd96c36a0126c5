//! OpenAI-compatible upstream client

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::{build_http_client, Completer, Completion, TokenUsage, UpstreamError};
use crate::api::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope, ModelsResponse, ResponsesRequest,
    ResponsesResponse,
};
use crate::config::UpstreamConfig;

/// Bearer-authenticated client for an OpenAI-compatible API
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build the client from configuration, resolving the credential
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let api_key = config.resolve_api_key()?;
        let http_client = build_http_client(config)?;
        Ok(Self::new(http_client, config.base_url(), api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `/models`, used to check connectivity and credentials
    pub async fn list_models(&self) -> Result<ModelsResponse, UpstreamError> {
        let url = format!("{}/models", self.base_url);
        tracing::debug!(url = %url, "Listing upstream models");

        let response = self.http_client.get(&url).bearer_auth(&self.api_key).send().await?;
        decode_response(response).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, UpstreamError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, "Sending upstream request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        decode_response(response).await
    }
}

async fn decode_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, UpstreamError> {
    let status = response.status();
    let body = response.bytes().await?;

    tracing::debug!(status = %status, bytes = body.len(), "Received upstream response");

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status,
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Pull the provider's error message out of a failure body, falling back to
/// the raw text
fn error_message(body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "<empty response body>".to_string()
    } else {
        text
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Completion, UpstreamError> {
        let response: ChatCompletionResponse = self.post_json("chat/completions", request).await?;

        let text = response.first_content().ok_or(UpstreamError::EmptyReply)?.to_string();
        Ok(Completion {
            text,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn create_response(&self, request: &ResponsesRequest) -> Result<Completion, UpstreamError> {
        let response: ResponsesResponse = self.post_json("responses", request).await?;

        let text = response.output_text().ok_or(UpstreamError::EmptyReply)?;
        Ok(Completion {
            text,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}
