//! Relay server: router, shared state and listener

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::RelayError;
use super::handler::RelayHandler;
use crate::api::{AskResponse, ChatResponse, ErrorResponse, HealthStatus};
use crate::config::AppConfig;
use crate::upstream::{Completer, OpenAiClient};

/// Shared state for the relay, initialized once at startup
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<AppConfig>,
    pub completer: Arc<dyn Completer>,
}

impl RelayState {
    pub fn new(config: AppConfig, completer: Arc<dyn Completer>) -> Self {
        Self {
            config: Arc::new(config),
            completer,
        }
    }
}

/// Build the router for the enabled endpoints
pub fn build_router(state: RelayState) -> Router {
    let mut router: Router<RelayState> = Router::new().route("/health", get(health_handler));

    if state.config.relay.ask.enabled {
        router = router.route("/ask", post(ask_handler));
    }
    if state.config.relay.chat.enabled {
        router = router.route("/chat", post(chat_handler));
    }

    router
        .fallback(not_found)
        // Prompts are relayed whatever their size
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the relay server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let completer = OpenAiClient::from_config(&config.upstream)?;
    let upstream_url = completer.base_url().to_string();

    let state = RelayState::new(config.clone(), Arc::new(completer));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;

    tracing::info!("prompt-relay listening on {}", listener.local_addr()?);
    tracing::info!("Relaying to {}", upstream_url);
    tracing::info!(
        ask = config.relay.ask.enabled,
        chat = config.relay.chat.enabled,
        "Relay endpoints configured"
    );

    Ok(axum::serve(listener, app).await?)
}

/// Health check endpoint; never touches upstream
async fn health_handler(State(state): State<RelayState>) -> Json<HealthStatus> {
    Json(HealthStatus::healthy(&state.config.relay.service_name))
}

async fn ask_handler(State(state): State<RelayState>, body: Bytes) -> Result<Json<AskResponse>, RelayError> {
    RelayHandler::new(state).ask(&body).await.map(Json)
}

async fn chat_handler(State(state): State<RelayState>, body: Bytes) -> Result<Json<ChatResponse>, RelayError> {
    RelayHandler::new(state).chat(&body).await.map(Json)
}

/// Fallback handler for unmatched routes
async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}
