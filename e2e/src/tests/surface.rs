//! Health, CORS and routing tests

use serde_json::json;

use crate::client::{post_json, send_get, send_preflight};
use crate::runner::TestContext;
use crate::types::MockResponse;
use crate::upstream::{drain_requests, queue_response};

use super::helpers::*;

/// /health is a fixed payload and never touches upstream
pub async fn test_health(ctx: TestContext) -> anyhow::Result<()> {
    let resp = send_get(&ctx.http_client, &ctx.relay_addr, "/health").await?;

    assert_status(resp.status, 200)?;
    assert_true(
        resp.body == json!({"status": "healthy", "service": "OpenAI GPT API"}),
        &format!("Unexpected health body: {}", resp.body),
    )?;
    assert_true(drain_requests(&ctx.upstream_state).is_empty(), "Health must not call upstream")?;

    Ok(())
}

/// Browser preflight succeeds for every route and allows any origin
pub async fn test_cors_preflight(ctx: TestContext) -> anyhow::Result<()> {
    for path in ["/ask", "/chat", "/health"] {
        let resp = send_preflight(&ctx.http_client, &ctx.relay_addr, path, "http://localhost:3000").await?;
        assert_true(
            (200..300).contains(&resp.status),
            &format!("Preflight {path} returned {}", resp.status),
        )?;
        assert_eq_str(
            resp.header("access-control-allow-origin").unwrap_or(""),
            "*",
            &format!("allow-origin for {path}"),
        )?;
    }

    Ok(())
}

/// Cross-origin POST carries the allow-origin header
pub async fn test_cors_on_response(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_chat_completion("4")));

    let url = format!("http://{}/ask", ctx.relay_addr);
    let resp = ctx
        .http_client
        .post(&url)
        .header("Origin", "https://intranet.example.com")
        .json(&json!({"question": "2+2?"}))
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Request failed: {}", e))?;

    assert_status(resp.status().as_u16(), 200)?;
    let allow_origin = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq_str(allow_origin, "*", "allow-origin")?;

    Ok(())
}

/// Unknown paths get a JSON 404
pub async fn test_unknown_route(ctx: TestContext) -> anyhow::Result<()> {
    let resp = send_get(&ctx.http_client, &ctx.relay_addr, "/v1/chat/completions").await?;
    assert_status(resp.status, 404)?;
    assert_true(resp.get_str("error").is_some(), "404 body must carry an error string")?;

    // Wrong method on a known route is not relayed either
    let resp = send_get(&ctx.http_client, &ctx.relay_addr, "/ask").await;
    assert_true(resp.is_err() || resp.is_ok_and(|r| r.status == 405), "GET /ask must not succeed")?;

    let resp = post_json(&ctx.http_client, &ctx.relay_addr, "/health", json!({})).await;
    assert_true(resp.is_err() || resp.is_ok_and(|r| r.status == 405), "POST /health must not succeed")?;

    assert_true(drain_requests(&ctx.upstream_state).is_empty(), "Upstream should not be called")?;

    Ok(())
}
