//! Request handler for the relay endpoints

use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Instant;

use super::error::RelayError;
use super::server::RelayState;
use crate::api::{AskRequest, AskResponse, ChatCompletionRequest, ChatRequest, ChatResponse, Endpoint, ResponsesRequest};
use crate::config::StatsFormat;
use crate::stats::{format_metrics, format_request_log, RelayMetrics};
use crate::upstream::{Completion, UpstreamError};

pub const MISSING_QUESTION: &str = "No question provided";
pub const MISSING_MESSAGE: &str = "Message is required";

/// Relay request handler
pub struct RelayHandler {
    state: RelayState,
}

impl RelayHandler {
    pub fn new(state: RelayState) -> Self {
        Self { state }
    }

    /// `/ask`: system persona + question through chat completions
    pub async fn ask(&self, body: &[u8]) -> Result<AskResponse, RelayError> {
        let request: AskRequest = parse_body(body)?;
        let question = require_text(request.question, MISSING_QUESTION)?;

        let settings = &self.state.config.relay.ask;
        let mut upstream_request =
            ChatCompletionRequest::with_system(&settings.model, &settings.system_prompt, &question);
        upstream_request.max_tokens = Some(settings.max_tokens);
        upstream_request.temperature = Some(settings.temperature);

        let call = self.state.completer.chat_completion(&upstream_request);
        let completion = self.relay(Endpoint::Ask, &settings.model, &question, call).await?;

        Ok(AskResponse {
            answer: completion.text,
        })
    }

    /// `/chat`: persona-prefixed message through the responses API
    pub async fn chat(&self, body: &[u8]) -> Result<ChatResponse, RelayError> {
        let request: ChatRequest = parse_body(body)?;
        let message = require_text(request.message, MISSING_MESSAGE)?;

        let settings = &self.state.config.relay.chat;
        let upstream_request = ResponsesRequest {
            model: settings.model.clone(),
            input: settings.compose_input(&message),
        };

        let call = self.state.completer.create_response(&upstream_request);
        let completion = self.relay(Endpoint::Chat, &settings.model, &message, call).await?;

        Ok(ChatResponse {
            reply: completion.text,
        })
    }

    /// Await one upstream call, logging the request, its outcome and stats
    async fn relay<F>(&self, endpoint: Endpoint, model: &str, prompt: &str, call: F) -> Result<Completion, RelayError>
    where
        F: Future<Output = Result<Completion, UpstreamError>>,
    {
        let start = Instant::now();
        tracing::info!("{}", format_request_log(endpoint, model, prompt));

        let mut metrics = RelayMetrics::new(endpoint, model, prompt);
        let outcome = call.await;
        metrics.record_outcome(&outcome, start);

        if let Err(ref e) = outcome {
            tracing::error!(endpoint = %endpoint, error = %e, "Upstream call failed");
        }

        let stats = &self.state.config.stats;
        if stats.enabled {
            let mut formatted = format_metrics(&metrics, stats.format);
            if stats.format == StatsFormat::Pretty {
                formatted.insert(0, '\n');
            }
            if metrics.is_success() {
                tracing::info!("{}", formatted);
            } else {
                tracing::warn!("{}", formatted);
            }
        }

        outcome.map_err(RelayError::from)
    }
}

/// Decode a request body; an unparseable body is an internal error, not a
/// client-input one
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse request body");
        RelayError::Internal(format!("Failed to parse request body: {}", e))
    })
}

/// Absent, null and empty are all "missing"; whitespace-only text is relayed
fn require_text(value: Option<String>, missing: &str) -> Result<String, RelayError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(RelayError::ClientInput(missing.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("hi".into()), "missing").unwrap(), "hi");
        assert_eq!(require_text(Some("   ".into()), "missing").unwrap(), "   ");
        assert!(matches!(require_text(Some(String::new()), "missing"), Err(RelayError::ClientInput(_))));
        assert!(matches!(require_text(None, "missing"), Err(RelayError::ClientInput(ref m)) if m == "missing"));
    }

    #[test]
    fn test_parse_body_errors_are_internal() {
        let err = parse_body::<AskRequest>(b"not json").unwrap_err();
        assert!(matches!(err, RelayError::Internal(_)));
        assert!(err.to_string().starts_with("Failed to parse request body"));

        assert!(parse_body::<AskRequest>(b"").is_err());
        assert!(parse_body::<AskRequest>(b"null").is_err());
        assert!(parse_body::<AskRequest>(b"[1, 2]").is_err());
    }

    #[test]
    fn test_parse_body_ok() {
        let req: ChatRequest = parse_body(br#"{"message": "hello"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("hello"));
    }
}
