//! Test registry - all test cases are registered here

pub mod ask;
pub mod helpers;
pub mod surface;

use crate::runner::TestCase;

/// Build and return all test cases
///
/// Tests are grouped by endpoint. Each test:
/// 1. Queues a mock upstream response (what the provider would return)
/// 2. Sends a request to the REAL relay
/// 3. Validates the response and what reached upstream
pub fn all_tests() -> Vec<TestCase> {
    macro_rules! test {
        ($name:expr, $desc:expr, $func:path) => {
            TestCase {
                name: $name,
                description: $desc,
                run: Box::new(|ctx| Box::pin($func(ctx))),
            }
        };
    }

    vec![
        // ── /ask ──────────────────────────────────────────────────────────────
        test!(
            "ask/answer",
            "Question relayed with system prompt; answer returned verbatim",
            ask::test_answer
        ),
        test!(
            "ask/bearer_auth",
            "OPENAI_API_KEY reaches upstream as a bearer token",
            ask::test_bearer_auth
        ),
        test!(
            "ask/missing_question",
            "Absent, null or empty question gives 400 without an upstream call",
            ask::test_missing_question
        ),
        test!(
            "ask/upstream_error",
            "Upstream 401 becomes a 500 carrying the provider message",
            ask::test_upstream_error
        ),
        test!(
            "ask/recovers_after_error",
            "A failed upstream call does not affect the next request",
            ask::test_recovers_after_error
        ),

        // ── /chat ─────────────────────────────────────────────────────────────
        test!(
            "chat/reply",
            "Message prefixed with persona; reply returned verbatim",
            chat::test_reply
        ),
        test!(
            "chat/multi_part_reply",
            "output_text parts are concatenated",
            chat::test_multi_part_reply
        ),
        test!(
            "chat/missing_message",
            "Absent or empty message gives 400 without an upstream call",
            chat::test_missing_message
        ),
        test!(
            "chat/garbled_upstream",
            "Non-JSON upstream body gives 500",
            chat::test_garbled_upstream
        ),
        test!(
            "chat/no_output_text",
            "Upstream response without message output gives 500",
            chat::test_no_output_text
        ),
        test!(
            "chat/malformed_body",
            "Non-JSON request body gives 500",
            chat::test_malformed_body
        ),

        // ── Health, CORS, routing ─────────────────────────────────────────────
        test!(
            "surface/health",
            "/health returns the fixed payload",
            surface::test_health
        ),
        test!(
            "surface/cors_preflight",
            "OPTIONS preflight succeeds and allows any origin",
            surface::test_cors_preflight
        ),
        test!(
            "surface/cors_on_response",
            "Cross-origin POST carries access-control-allow-origin",
            surface::test_cors_on_response
        ),
        test!(
            "surface/unknown_route",
            "Unknown paths and wrong methods are not relayed",
            surface::test_unknown_route
        ),
    ]
}
