mod request_executor;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gravitate_types::{BridgeConfig, ProxyError};
use reqwest::Client;
use serde_json::{json, Value};

use super::agent_defaults::apply_agent_defaults;
use super::limiter::{ConcurrencyLimiter, RequestLimiter};
use crate::error::AppResult;
pub use request_executor::{build_headers, build_url, DEFAULT_USER_AGENT};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Per-call extras for [`UpstreamClient::call_v1_internal`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub query_string: Option<String>,
    pub headers: HashMap<String, String>,
}

impl CallOptions {
    pub fn sse() -> Self {
        Self { query_string: Some("alt=sse".to_string()), ..Self::default() }
    }
}

pub struct UpstreamClient {
    http_client: Client,
    base_urls: Vec<String>,
    limiter: Arc<dyn RequestLimiter>,
    request_timeout: Option<Duration>,
}

impl UpstreamClient {
    /// Create a new UpstreamClient with the given HTTP client.
    pub fn new(
        http_client: Client,
        base_urls: Vec<String>,
        limiter: Arc<dyn RequestLimiter>,
    ) -> Self {
        Self { http_client, base_urls, limiter, request_timeout: None }
    }

    /// Build the HTTP client, limiter and endpoint list from configuration.
    pub fn from_config(config: &BridgeConfig) -> AppResult<Self> {
        let http_client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        let limiter = Arc::new(ConcurrencyLimiter::new(config.max_concurrent_requests));
        Ok(Self::new(http_client, config.base_urls.clone(), limiter)
            .with_request_timeout(Duration::from_secs(config.request_timeout_secs)))
    }

    /// Deadline for unary calls. Streaming calls are bounded by the read timeout instead.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    pub async fn call_v1_internal(
        &self,
        method: &str,
        access_token: &str,
        body: &Value,
        options: &CallOptions,
    ) -> Result<reqwest::Response, ProxyError> {
        let mut body = body.clone();
        if method == "generateContent" || method == "streamGenerateContent" {
            apply_agent_defaults(&mut body);
        }

        let _permit = self.limiter.acquire().await?;
        let headers = build_headers(access_token, &options.headers)?;
        let timeout = if method == "streamGenerateContent" { None } else { self.request_timeout };

        request_executor::execute_with_fallback(
            &self.http_client,
            method,
            headers,
            &body,
            options.query_string.as_deref(),
            &self.base_urls,
            timeout,
        )
        .await
    }

    /// Raw `fetchAvailableModels` payload.
    pub async fn fetch_available_models(&self, access_token: &str) -> Result<Value, ProxyError> {
        let resp = self
            .call_v1_internal("fetchAvailableModels", access_token, &json!({}), &CallOptions::default())
            .await?;
        read_json("fetchAvailableModels", resp).await
    }

    pub async fn count_tokens(
        &self,
        access_token: &str,
        model: &str,
        contents: &Value,
    ) -> Result<reqwest::Response, ProxyError> {
        let body = json!({ "request": { "model": model, "contents": contents } });
        self.call_v1_internal("countTokens", access_token, &body, &CallOptions::default()).await
    }

    /// Resolve the Cloud Code companion project for an access token.
    pub async fn fetch_project_id(&self, access_token: &str) -> Result<String, ProxyError> {
        let body = json!({ "metadata": { "ideType": "ANTIGRAVITY" } });
        let resp = self
            .call_v1_internal("loadCodeAssist", access_token, &body, &CallOptions::default())
            .await?;
        let data = read_json("loadCodeAssist", resp).await?;

        data.get("cloudaicompanionProject")
            .and_then(|p| p.as_str().or_else(|| p.get("id").and_then(Value::as_str)))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProxyError::Credentials {
                message: "loadCodeAssist returned no cloudaicompanionProject".to_string(),
            })
    }
}

async fn read_json(method: &str, resp: reqwest::Response) -> Result<Value, ProxyError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(ProxyError::Upstream {
            message: format!("{} returned {}: {}", method, status, text),
        });
    }
    resp.json::<Value>()
        .await
        .map_err(|e| ProxyError::Transform { message: format!("{} body: {}", method, e) })
}
