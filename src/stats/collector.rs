//! Metrics collection for relay requests

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

use crate::api::Endpoint;
use crate::upstream::{Completion, UpstreamError};

/// Collected metrics from one relay request/upstream call
#[derive(Debug, Clone, Serialize)]
pub struct RelayMetrics {
    /// Unique request ID
    pub request_id: String,
    /// Timestamp of the request
    pub timestamp: DateTime<Utc>,
    /// Relay endpoint that handled the request
    pub endpoint: Endpoint,
    /// Upstream API surface called
    pub upstream_api: &'static str,
    /// Model requested (replaced by the upstream-reported model on success)
    pub model: String,
    /// Caller prompt length in characters
    pub prompt_chars: usize,
    /// Reply length in characters
    pub reply_chars: usize,
    /// HTTP status returned to the caller
    pub status: u16,
    /// Provider-reported token usage
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    /// Error text when the upstream call failed
    pub error: Option<String>,
    /// Request duration in ms
    pub duration_ms: f64,
}

impl RelayMetrics {
    /// Start a metrics record for a prompt about to be relayed
    pub fn new(endpoint: Endpoint, model: &str, prompt: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            endpoint,
            upstream_api: endpoint.upstream_api(),
            model: model.to_string(),
            prompt_chars: prompt.chars().count(),
            reply_chars: 0,
            status: 0,
            input_tokens: None,
            output_tokens: None,
            total_tokens: None,
            error: None,
            duration_ms: 0.0,
        }
    }

    /// Fill in the outcome of the upstream call
    pub fn record_outcome(&mut self, outcome: &Result<Completion, UpstreamError>, start: Instant) {
        self.duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(completion) => {
                self.status = 200;
                self.reply_chars = completion.text.chars().count();
                if let Some(ref model) = completion.model {
                    self.model = model.clone();
                }
                if let Some(usage) = completion.usage {
                    self.input_tokens = Some(usage.input_tokens);
                    self.output_tokens = Some(usage.output_tokens);
                    self.total_tokens = Some(usage.total_tokens);
                }
            }
            Err(e) => {
                self.status = 500;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
