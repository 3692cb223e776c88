use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static RESET_AFTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_reset_after_regex() -> &'static Regex {
    RESET_AFTER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)reset after (\d+)s").expect("Reset after regex is valid")
    })
}

/// Quota reset delay in milliseconds from a 429 body.
///
/// Reads `error.message` when the body is JSON, otherwise scans the raw text.
pub fn parse_retry_delay_ms(raw: &str) -> Option<u64> {
    let message = serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string));
    let haystack = message.as_deref().unwrap_or(raw);

    let caps = get_reset_after_regex().captures(haystack)?;
    let secs = caps.get(1)?.as_str().parse::<u64>().ok()?;
    Some(secs.saturating_mul(1000))
}

/// Milliseconds rounded up to whole seconds, for a `Retry-After` header.
pub fn retry_after_secs(delay_ms: u64) -> u64 {
    delay_ms.div_ceil(1000)
}
