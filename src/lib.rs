//! prompt-relay: small HTTP relay in front of an OpenAI-compatible API
//!
//! Features:
//! - `/ask` relayed through chat completions with a system persona
//! - `/chat` relayed through the responses API with a prefixed persona
//! - Permissive CORS so browser front ends can call it directly
//! - Per-request stats logging

pub mod api;
pub mod config;
pub mod relay;
pub mod stats;
pub mod upstream;

pub use config::AppConfig;
pub use relay::{build_router, run_server, RelayState};
pub use upstream::{Completer, OpenAiClient};
