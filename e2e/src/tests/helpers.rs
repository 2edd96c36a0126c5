//! Common test helpers and JSON builders

use serde_json::{json, Value};

/// Persona configured in test_configs/relay.yaml for /chat
pub const CHAT_PERSONA: &str = "You are Nexus, a helpful AI productivity assistant for employees.";

/// System prompt configured in test_configs/relay.yaml for /ask
pub const ASK_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

// ─── Upstream response builders ──────────────────────────────────────────────

/// Chat completion the upstream returns for /ask
pub fn upstream_chat_completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-test001",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-5.1",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 12,
            "completion_tokens": 3,
            "total_tokens": 15
        }
    })
    .to_string()
}

/// Responses API result the upstream returns for /chat; each part becomes an
/// output_text item of a single assistant message
pub fn upstream_response(parts: &[&str]) -> String {
    let content: Vec<Value> = parts
        .iter()
        .map(|text| json!({"type": "output_text", "text": text, "annotations": []}))
        .collect();

    json!({
        "id": "resp-test001",
        "object": "response",
        "created_at": 1700000000,
        "model": "gpt-5.1",
        "status": "completed",
        "output": [
            {"type": "reasoning", "id": "rs-001", "summary": []},
            {"type": "message", "id": "msg-001", "role": "assistant", "content": content}
        ],
        "usage": {
            "input_tokens": 20,
            "output_tokens": 8,
            "total_tokens": 28
        }
    })
    .to_string()
}

/// Provider error envelope
pub fn upstream_error(message: &str) -> String {
    json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "code": "invalid_api_key"
        }
    })
    .to_string()
}

// ─── Assertion helpers ────────────────────────────────────────────────────────

/// Assert two strings are equal, with context on failure
pub fn assert_eq_str(actual: &str, expected: &str, label: &str) -> anyhow::Result<()> {
    if actual != expected {
        Err(anyhow::anyhow!("{label}: expected {:?} but got {:?}", expected, actual))
    } else {
        Ok(())
    }
}

/// Assert the relay answered with this status
pub fn assert_status(actual: u16, expected: u16) -> anyhow::Result<()> {
    assert_true(actual == expected, &format!("Expected {expected}, got {actual}"))
}

/// Assert condition is true, with message
pub fn assert_true(cond: bool, msg: &str) -> anyhow::Result<()> {
    if !cond {
        Err(anyhow::anyhow!("{}", msg))
    } else {
        Ok(())
    }
}
