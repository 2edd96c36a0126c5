//! `/ask` tests - question in, chat-completions answer out

use serde_json::json;

use crate::client::post_json;
use crate::runner::TestContext;
use crate::types::{get_path, MockResponse};
use crate::upstream::{drain_requests, queue_response};
use crate::TEST_API_KEY;

use super::helpers::*;

/// Question is relayed with the system prompt and the answer comes back verbatim
pub async fn test_answer(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_chat_completion("4")));

    let resp = post_json(&ctx.http_client, &ctx.relay_addr, "/ask", json!({"question": "2+2?"})).await?;

    assert_status(resp.status, 200)?;
    assert_true(resp.body == json!({"answer": "4"}), &format!("Unexpected body: {}", resp.body))?;

    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(reqs.len() == 1, &format!("Expected 1 upstream request, got {}", reqs.len()))?;
    let req = &reqs[0];
    assert_eq_str(&req.path, "/v1/chat/completions", "upstream path")?;

    let get = |path: &str| get_path(&req.body, path).and_then(|v| v.as_str()).unwrap_or_default();
    assert_eq_str(get("model"), "gpt-5.1", "model")?;
    assert_eq_str(get("messages.0.role"), "system", "first role")?;
    assert_eq_str(get("messages.0.content"), ASK_SYSTEM_PROMPT, "system prompt")?;
    assert_eq_str(get("messages.1.role"), "user", "second role")?;
    assert_eq_str(get("messages.1.content"), "2+2?", "question")?;

    let max_tokens = req.body.get("max_tokens").and_then(|v| v.as_u64());
    assert_true(max_tokens == Some(500), &format!("Expected max_tokens=500, got {:?}", max_tokens))?;
    let temperature = req.body.get("temperature").and_then(|v| v.as_f64()).unwrap_or_default();
    assert_true(
        (temperature - 0.7).abs() < 1e-6,
        &format!("Expected temperature=0.7, got {}", temperature),
    )?;

    Ok(())
}

/// The credential from the environment reaches upstream as a bearer token
pub async fn test_bearer_auth(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_chat_completion("ok")));

    post_json(&ctx.http_client, &ctx.relay_addr, "/ask", json!({"question": "auth?"})).await?;

    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(!reqs.is_empty(), "Upstream received no request")?;
    let expected = format!("Bearer {TEST_API_KEY}");
    assert_eq_str(reqs[0].authorization.as_deref().unwrap_or(""), &expected, "authorization")?;

    Ok(())
}

/// Missing, null and empty questions are rejected without calling upstream
pub async fn test_missing_question(ctx: TestContext) -> anyhow::Result<()> {
    for body in [json!({}), json!({"question": ""}), json!({"question": null}), json!({"q": "hi"})] {
        let resp = post_json(&ctx.http_client, &ctx.relay_addr, "/ask", body.clone()).await?;
        assert_status(resp.status, 400)?;
        assert_eq_str(
            resp.get_str("error").unwrap_or_default(),
            "No question provided",
            &format!("error for {body}"),
        )?;
    }

    let reqs = drain_requests(&ctx.upstream_state);
    assert_true(reqs.is_empty(), &format!("Upstream should not be called, got {} request(s)", reqs.len()))?;

    Ok(())
}

/// Upstream rejection becomes a 500 carrying the provider's message
pub async fn test_upstream_error(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(
        &ctx.upstream_state,
        MockResponse::error(401, upstream_error("Incorrect API key provided")),
    );

    let resp = post_json(&ctx.http_client, &ctx.relay_addr, "/ask", json!({"question": "hello"})).await?;

    assert_status(resp.status, 500)?;
    let error = resp.get_str("error").unwrap_or_default();
    assert_true(
        error.contains("Incorrect API key provided"),
        &format!("Error should carry the upstream message, got {:?}", error),
    )?;

    Ok(())
}

/// A failed call does not poison the relay for the next request
pub async fn test_recovers_after_error(ctx: TestContext) -> anyhow::Result<()> {
    queue_response(&ctx.upstream_state, MockResponse::error(503, upstream_error("overloaded")));
    queue_response(&ctx.upstream_state, MockResponse::json(upstream_chat_completion("back online")));

    let first = post_json(&ctx.http_client, &ctx.relay_addr, "/ask", json!({"question": "one"})).await?;
    assert_status(first.status, 500)?;

    let second = post_json(&ctx.http_client, &ctx.relay_addr, "/ask", json!({"question": "two"})).await?;
    assert_status(second.status, 200)?;
    assert_eq_str(second.get_str("answer").unwrap_or_default(), "back online", "answer")?;

    Ok(())
}
