//! Stats formatting for different output formats

use super::RelayMetrics;
use crate::config::StatsFormat;

/// Format metrics according to the configured format
pub fn format_metrics(metrics: &RelayMetrics, format: StatsFormat) -> String {
    match format {
        StatsFormat::Pretty => format_pretty(metrics),
        StatsFormat::Json => format_json(metrics),
        StatsFormat::Compact => format_compact(metrics),
    }
}

fn tokens_str(m: &RelayMetrics) -> String {
    match (m.input_tokens, m.output_tokens, m.total_tokens) {
        (Some(input), Some(output), Some(total)) => format!("{}/{} ({} total)", input, output, total),
        _ => "N/A".to_string(),
    }
}

/// Pretty box format for terminal output
fn format_pretty(m: &RelayMetrics) -> String {
    let outcome = match m.error {
        Some(ref e) => format!("{} {}", m.status, truncate(e, 52)),
        None => m.status.to_string(),
    };

    format!(
        r#"┌──────────────────────────────────────────────────────────────────┐
│ Relay Request                                                    │
├──────────────────────────────────────────────────────────────────┤
│ Endpoint: /{:54}│
│ Upstream: {:55}│
│ Model:    {:55}│
│ Time:     {:55}│
├──────────────────────────────────────────────────────────────────┤
│ Prompt chars: {:8} │ Reply chars: {:8}                    │
│ Tokens (in/out): {:48}│
├──────────────────────────────────────────────────────────────────┤
│ Status:   {:55}│
│ Duration: {:53.1}ms│
└──────────────────────────────────────────────────────────────────┘
"#,
        m.endpoint.name(),
        m.upstream_api,
        truncate(&m.model, 55),
        m.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        m.prompt_chars,
        m.reply_chars,
        tokens_str(m),
        outcome,
        m.duration_ms,
    )
}

/// JSON format for structured logging
fn format_json(m: &RelayMetrics) -> String {
    serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string())
}

/// Compact single-line format
fn format_compact(m: &RelayMetrics) -> String {
    let tokens = match (m.input_tokens, m.output_tokens) {
        (Some(input), Some(output)) => format!("{}/{}", input, output),
        _ => "N/A".to_string(),
    };

    format!(
        "[{}] /{} api={} model={} chars={}/{} tokens={} status={} dur={:.1}ms",
        m.timestamp.format("%H:%M:%S"),
        m.endpoint.name(),
        m.upstream_api,
        m.model,
        m.prompt_chars,
        m.reply_chars,
        tokens,
        m.status,
        m.duration_ms
    )
}

/// Truncate a string to max characters with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
