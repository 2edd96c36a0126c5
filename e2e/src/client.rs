//! HTTP client that simulates how a browser front end talks to the relay

use reqwest::{Client, Method, RequestBuilder};

use crate::types::RelayResponse;

/// Build an HTTP client
pub fn build_client() -> Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
}

/// POST a JSON body to a relay endpoint
pub async fn post_json(
    client: &Client,
    relay_addr: &str,
    path: &str,
    body: serde_json::Value,
) -> anyhow::Result<RelayResponse> {
    let url = format!("http://{relay_addr}{path}");
    send(client.post(&url).json(&body), &url).await
}

/// POST a raw (possibly malformed) body to a relay endpoint
pub async fn post_raw(client: &Client, relay_addr: &str, path: &str, body: &str) -> anyhow::Result<RelayResponse> {
    let url = format!("http://{relay_addr}{path}");
    let request = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(body.to_string());
    send(request, &url).await
}

/// GET a relay path
pub async fn send_get(client: &Client, relay_addr: &str, path: &str) -> anyhow::Result<RelayResponse> {
    let url = format!("http://{relay_addr}{path}");
    send(client.get(&url), &url).await
}

/// Send a CORS preflight the way a browser does before a cross-origin POST
pub async fn send_preflight(client: &Client, relay_addr: &str, path: &str, origin: &str) -> anyhow::Result<RelayResponse> {
    let url = format!("http://{relay_addr}{path}");
    let request = client
        .request(Method::OPTIONS, &url)
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type");
    send(request, &url).await
}

async fn send(request: RequestBuilder, url: &str) -> anyhow::Result<RelayResponse> {
    let resp = request
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request to {}: {}", url, e))?;

    let status = resp.status().as_u16();
    let headers = resp.headers().clone();
    let body_text = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read relay response: {}", e))?;

    // Preflight responses have no body
    let body = if body_text.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&body_text).map_err(|e| {
            anyhow::anyhow!(
                "Relay response is not valid JSON: {}: {}",
                e,
                body_text.chars().take(500).collect::<String>()
            )
        })?
    };

    Ok(RelayResponse { status, headers, body })
}
