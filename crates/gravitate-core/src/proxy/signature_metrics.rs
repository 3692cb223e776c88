//! Counters for signature cache and fallback observability.
//!
//! Recorded through the `metrics` facade; they are no-ops until the host
//! installs a recorder.

use metrics::{counter, describe_counter};

/// Register metric descriptions. Call once after installing a recorder.
pub fn describe_signature_metrics() {
    describe_counter!(
        "gravitate_signature_cache_total",
        "Signature cache operations by result (store, hit, miss)"
    );
    describe_counter!(
        "gravitate_dummy_signature_total",
        "functionCall parts patched with the placeholder signature"
    );
    describe_counter!(
        "gravitate_upstream_fallback_total",
        "Upstream endpoint advances after 429 or transport failure"
    );
}

pub(crate) fn record_signature_cache(op: &'static str) {
    counter!("gravitate_signature_cache_total", "op" => op).increment(1);
}

pub(crate) fn record_dummy_signature() {
    counter!("gravitate_dummy_signature_total").increment(1);
}

pub(crate) fn record_upstream_fallback(reason: &'static str) {
    counter!("gravitate_upstream_fallback_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        describe_signature_metrics();
        record_signature_cache("store");
        record_dummy_signature();
        record_upstream_fallback("transport");
    }
}
