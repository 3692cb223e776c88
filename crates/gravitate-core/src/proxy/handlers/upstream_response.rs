//! Forwarding of upstream responses the bridge does not transform.

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use reqwest::StatusCode;

use crate::proxy::common::sanitize_upstream_headers;
use crate::proxy::rate_limit::{parse_retry_delay_ms, retry_after_secs};

/// Relay a non-success upstream response unchanged, adding `Retry-After`
/// to a 429 that has none when the body names a reset delay.
pub async fn forward_error_response(resp: reqwest::Response) -> Response {
    let status = resp.status();
    let mut headers = sanitize_upstream_headers(resp.headers());
    let body = resp.bytes().await.unwrap_or_default();

    tracing::warn!(
        "[Upstream] Forwarding {} ({} bytes): {}",
        status,
        body.len(),
        String::from_utf8_lossy(&body).chars().take(300).collect::<String>()
    );

    if status == StatusCode::TOO_MANY_REQUESTS && !headers.contains_key(header::RETRY_AFTER) {
        if let Some(delay_ms) = parse_retry_delay_ms(&String::from_utf8_lossy(&body)) {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs(delay_ms).to_string()) {
                headers.insert(header::RETRY_AFTER, value);
            }
        }
    }

    (status, headers, Body::from(body)).into_response()
}

/// Relay an upstream response body as-is.
pub async fn passthrough_response(resp: reqwest::Response) -> Response {
    let status = resp.status();
    let headers = sanitize_upstream_headers(resp.headers());
    let body = resp.bytes().await.unwrap_or_default();
    (status, headers, Body::from(body)).into_response()
}

pub fn sse_response(body: Body) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}
