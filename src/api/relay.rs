//! Request and response bodies of the relay's own HTTP surface

use serde::{Deserialize, Serialize};

/// Relay endpoints that call upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// `/ask`: chat completions with a system message
    Ask,
    /// `/chat`: responses API with the persona prefixed to the input
    Chat,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Ask => "ask",
            Endpoint::Chat => "chat",
        }
    }

    /// Upstream API surface the endpoint calls
    pub fn upstream_api(&self) -> &'static str {
        match self {
            Endpoint::Ask => "chat.completions",
            Endpoint::Chat => "responses",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `POST /ask` body
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// `POST /ask` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// `POST /chat` body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /chat` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /health` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
        }
    }
}
