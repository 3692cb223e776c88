use std::collections::HashMap;
use std::time::Duration;

use gravitate_types::ProxyError;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;

use crate::proxy::signature_metrics::record_upstream_fallback;

pub const DEFAULT_USER_AGENT: &str = "antigravity/1.11.9 windows/amd64";

pub fn build_url(base_url: &str, method: &str, query_string: Option<&str>) -> String {
    match query_string.map(|qs| qs.trim_start_matches('?')).filter(|qs| !qs.is_empty()) {
        Some(qs) => format!("{}:{}?{}", base_url, method, qs),
        None => format!("{}:{}", base_url, method),
    }
}

pub fn build_headers(
    access_token: &str,
    extra_headers: &HashMap<String, String>,
) -> Result<header::HeaderMap, ProxyError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| ProxyError::Credentials { message: e.to_string() })?,
    );
    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(DEFAULT_USER_AGENT));

    for (k, v) in extra_headers {
        if let (Ok(hk), Ok(hv)) =
            (header::HeaderName::from_bytes(k.as_bytes()), header::HeaderValue::from_str(v))
        {
            headers.insert(hk, hv);
        }
    }

    Ok(headers)
}

/// Try each base URL in order. A 429 advances while endpoints remain; any
/// other response is returned as-is. Transport failures advance too, and
/// surface as an error only on the last endpoint.
pub async fn execute_with_fallback(
    client: &Client,
    method: &str,
    headers: header::HeaderMap,
    body: &Value,
    query_string: Option<&str>,
    base_urls: &[String],
    timeout: Option<Duration>,
) -> Result<Response, ProxyError> {
    let mut last_err: Option<String> = None;

    for (idx, base_url) in base_urls.iter().enumerate() {
        let url = build_url(base_url, method, query_string);
        let has_next = idx + 1 < base_urls.len();

        let mut request = client.post(&url).headers(headers.clone()).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(resp) => {
                let status = resp.status();

                if status == StatusCode::TOO_MANY_REQUESTS && has_next {
                    tracing::warn!(
                        "[Upstream] Endpoint returned {} at {} (method={}), trying next",
                        status,
                        base_url,
                        method
                    );
                    record_upstream_fallback("rate_limited");
                    drop(resp);
                    continue;
                }

                if idx > 0 {
                    tracing::info!(
                        "[Upstream] Fallback finished | Endpoint: {} | Status: {} | Attempt: {}/{}",
                        base_url,
                        status,
                        idx + 1,
                        base_urls.len()
                    );
                } else {
                    tracing::debug!(
                        "[Upstream] Request finished | Endpoint: {} | Status: {}",
                        base_url,
                        status
                    );
                }
                return Ok(resp);
            },
            Err(e) => {
                let msg = format!("HTTP request failed at {}: {}", base_url, e);
                tracing::error!("[Upstream] {}", msg);
                last_err = Some(msg);
                if has_next {
                    record_upstream_fallback("transport");
                }
            },
        }
    }

    Err(ProxyError::Upstream {
        message: last_err.unwrap_or_else(|| "No upstream endpoints configured".to_string()),
    })
}
