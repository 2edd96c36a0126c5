//! Mock upstream server that simulates the OpenAI API
//!
//! Serves the endpoints the relay calls. Tests pre-configure responses via
//! SharedUpstreamState before each request.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::types::{MockResponse, ReceivedRequest, SharedUpstreamState, UpstreamState};

/// Default models list returned by /v1/models
fn default_models_response() -> &'static str {
    r#"{"object":"list","data":[{"id":"gpt-5.1","object":"model","created":1700000000,"owned_by":"openai"}]}"#
}

/// Default fallback for /v1/chat/completions when no response is queued
fn default_chat_completion() -> MockResponse {
    MockResponse::json(
        r#"{"id":"chatcmpl-default","object":"chat.completion","created":1700000000,"model":"gpt-5.1","choices":[{"index":0,"message":{"role":"assistant","content":"Default answer (no mock queued)"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
    )
}

/// Default fallback for /v1/responses when no response is queued
fn default_response() -> MockResponse {
    MockResponse::json(
        r#"{"id":"resp-default","object":"response","model":"gpt-5.1","status":"completed","output":[{"type":"message","role":"assistant","content":[{"type":"output_text","text":"Default reply (no mock queued)"}]}],"usage":{"input_tokens":10,"output_tokens":5,"total_tokens":15}}"#,
    )
}

/// Record the request, then pop the next queued response (or the fallback)
fn serve_queued(
    state: &SharedUpstreamState,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    fallback: fn() -> MockResponse,
) -> Response {
    let received = ReceivedRequest {
        method: "POST".to_string(),
        path: path.to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(body).unwrap_or(serde_json::Value::Null),
    };

    let mock_response = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(received);
        state.response_queue.pop_front().unwrap_or_else(fallback)
    };

    Response::builder()
        .status(mock_response.status)
        .header(header::CONTENT_TYPE, &mock_response.content_type)
        .body(Body::from(mock_response.body))
        .unwrap()
        .into_response()
}

/// Handle POST /v1/chat/completions
async fn handle_chat_completions(State(state): State<SharedUpstreamState>, headers: HeaderMap, body: Bytes) -> Response {
    serve_queued(&state, "/v1/chat/completions", &headers, &body, default_chat_completion)
}

/// Handle POST /v1/responses
async fn handle_responses(State(state): State<SharedUpstreamState>, headers: HeaderMap, body: Bytes) -> Response {
    serve_queued(&state, "/v1/responses", &headers, &body, default_response)
}

/// Handle GET /v1/models
async fn handle_models() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        default_models_response(),
    )
}

/// Start the mock upstream server and return the shared state handle
pub async fn start(port: u16) -> anyhow::Result<SharedUpstreamState> {
    let state: SharedUpstreamState = std::sync::Arc::new(std::sync::Mutex::new(UpstreamState::default()));

    let app = Router::new()
        .route("/v1/chat/completions", post(handle_chat_completions))
        .route("/v1/responses", post(handle_responses))
        .route("/v1/models", get(handle_models))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind mock upstream to {}: {}", addr, e))?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream server failed");
    });

    // Brief pause to let the server start accepting connections
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    Ok(state)
}

/// Configure the next completion response
pub fn queue_response(state: &SharedUpstreamState, response: MockResponse) {
    state.lock().unwrap().response_queue.push_back(response);
}

/// Get all requests received since last clear
pub fn drain_requests(state: &SharedUpstreamState) -> Vec<ReceivedRequest> {
    let mut s = state.lock().unwrap();
    s.received_requests.drain(..).collect()
}
