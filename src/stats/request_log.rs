//! Request logging formatter

use crate::api::Endpoint;

/// Format a one-line summary of an incoming relay request
pub fn format_request_log(endpoint: Endpoint, model: &str, prompt: &str) -> String {
    let normalized = normalize_whitespace(prompt);

    let parts = [
        format!("endpoint={}", endpoint),
        format!("model={}", model),
        format!("chars={}", prompt.chars().count()),
        format!("\"{}\"", truncate_message(&normalized)),
    ];

    format!("→ {}", parts.join(" "))
}

/// Convert newlines and tabs to single spaces, collapse multiple spaces
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate message according to rules:
/// - If <= 100 chars: show all
/// - If > 100 chars: first 25 + " ... " + last 75
fn truncate_message(s: &str) -> String {
    const MAX_TOTAL: usize = 100;
    const PREFIX_LEN: usize = 25;
    const SUFFIX_LEN: usize = 75;
    const ELLIPSIS: &str = " ... ";

    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= MAX_TOTAL {
        return s.to_string();
    }

    let prefix: String = chars[..PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - SUFFIX_LEN..].iter().collect();

    format!("{}{}{}", prefix, ELLIPSIS, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_request_log_basic() {
        let log = format_request_log(Endpoint::Ask, "gpt-5.1", "What is 2+2?");
        assert!(log.starts_with("→ "));
        assert!(log.contains("endpoint=ask"));
        assert!(log.contains("model=gpt-5.1"));
        assert!(log.contains("chars=12"));
        assert!(log.contains("\"What is 2+2?\""));
    }

    #[test]
    fn test_format_request_log_normalizes_prompt() {
        let log = format_request_log(Endpoint::Chat, "gpt-5.1", "Plan\nmy\t\tweek");
        assert!(log.contains("endpoint=chat"));
        assert!(log.contains("\"Plan my week\""));
        // Length is reported for the raw prompt
        assert!(log.contains("chars=13"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("hello\nworld"), "hello world");
        assert_eq!(normalize_whitespace("hello\t\tworld"), "hello world");
        assert_eq!(normalize_whitespace("hello\r\nworld"), "hello world");
        assert_eq!(normalize_whitespace("  hello   world "), "hello world");
    }

    #[test]
    fn test_truncate_message_short() {
        let msg = "This is a short message";
        assert_eq!(truncate_message(msg), msg);
    }

    #[test]
    fn test_truncate_message_exactly_100() {
        let msg = "x".repeat(100);
        assert_eq!(truncate_message(&msg).len(), 100);
    }

    #[test]
    fn test_truncate_message_long() {
        let msg = "x".repeat(300);
        let truncated = truncate_message(&msg);
        assert!(truncated.starts_with(&"x".repeat(25)));
        assert!(truncated.contains(" ... "));
        assert!(truncated.ends_with(&"x".repeat(75)));
        assert_eq!(truncated.len(), 105);
    }

    #[test]
    fn test_truncate_message_multibyte() {
        let msg = "日本語".repeat(50);
        let truncated = truncate_message(&msg);
        assert_eq!(truncated.chars().count(), 105);
        assert!(truncated.contains(" ... "));
    }
}
