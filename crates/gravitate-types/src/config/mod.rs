//! Bridge configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// Cloud Code v1internal endpoints, tried in this order (Sandbox → Daily → Prod).
pub const DEFAULT_V1INTERNAL_BASE_URLS: [&str; 3] = [
    "https://daily-cloudcode-pa.sandbox.googleapis.com/v1internal",
    "https://daily-cloudcode-pa.googleapis.com/v1internal",
    "https://cloudcode-pa.googleapis.com/v1internal",
];

/// Full bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct BridgeConfig {
    /// Candidate v1internal base URLs, tried in order
    #[serde(default = "default_base_urls")]
    #[validate(length(min = 1_u64))]
    pub base_urls: Vec<String>,
    /// Patch the first unsigned functionCall of a current-turn message with a placeholder
    #[serde(default)]
    pub dummy_signature_fallback: bool,
    /// Log raw and wrapped request/response bodies at debug level
    #[serde(default)]
    pub debug_traffic: bool,
    /// Tool-call signature cache bounds
    #[serde(default)]
    #[validate(nested)]
    pub signature_cache: SignatureCacheConfig,
    /// Upper bound on in-flight upstream calls
    #[serde(default = "default_max_concurrent_requests")]
    #[validate(range(min = 1_usize, max = 1024_usize))]
    pub max_concurrent_requests: usize,
    /// Timeout for issuing the upstream request, in seconds
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 5_u64, max = 3600_u64))]
    pub request_timeout_secs: u64,
    /// Per-event read timeout on upstream streams; `None` waits indefinitely
    #[serde(default)]
    pub stream_read_timeout_secs: Option<u64>,
    /// Default tracing filter directive (overridden by `RUST_LOG`)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_urls: default_base_urls(),
            dummy_signature_fallback: false,
            debug_traffic: false,
            signature_cache: SignatureCacheConfig::default(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout_secs: default_request_timeout(),
            stream_read_timeout_secs: None,
            log_filter: default_log_filter(),
        }
    }
}

impl BridgeConfig {
    /// Run field validation and map the result into a [`ConfigError`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(|e| ConfigError::from_validation(&e))?;
        Ok(self)
    }
}

/// Bounds for the tool-call signature cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct SignatureCacheConfig {
    /// Maximum number of cached tool ids
    #[serde(default = "default_cache_capacity")]
    #[validate(range(min = 1_usize))]
    pub capacity: usize,
    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    #[validate(range(min = 1_u64))]
    pub ttl_secs: u64,
}

impl Default for SignatureCacheConfig {
    fn default() -> Self {
        Self { capacity: default_cache_capacity(), ttl_secs: default_cache_ttl() }
    }
}

pub fn default_base_urls() -> Vec<String> {
    DEFAULT_V1INTERNAL_BASE_URLS.iter().map(|u| (*u).to_string()).collect()
}

pub const fn default_max_concurrent_requests() -> usize {
    16
}

pub const fn default_request_timeout() -> u64 {
    120
}

pub const fn default_cache_capacity() -> usize {
    2000
}

pub const fn default_cache_ttl() -> u64 {
    7 * 24 * 60 * 60
}

pub fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: BridgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.base_urls.len(), 3);
        assert!(config.base_urls[0].contains("sandbox"));
        assert_eq!(config.signature_cache.capacity, 2000);
        assert!(!config.dummy_signature_fallback);
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let config = BridgeConfig { max_concurrent_requests: 0, ..BridgeConfig::default() };
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_validation_rejects_empty_endpoints() {
        let config = BridgeConfig { base_urls: vec![], ..BridgeConfig::default() };
        assert!(config.validated().is_err());
    }
}
