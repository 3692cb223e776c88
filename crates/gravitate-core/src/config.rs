//! Environment overrides for [`BridgeConfig`].

use gravitate_types::config::default_base_urls;
use gravitate_types::{BridgeConfig, ConfigError};
use std::str::FromStr;

pub const ENV_BASE_URL: &str = "GRAVITATE_V1INTERNAL_BASE_URL";
pub const ENV_DUMMY_SIGNATURE: &str = "GRAVITATE_THOUGHT_SIGNATURE_DUMMY";
pub const ENV_DEBUG: &str = "GRAVITATE_DEBUG";
pub const ENV_MAX_CONCURRENCY: &str = "GRAVITATE_MAX_CONCURRENCY";
pub const ENV_REQUEST_TIMEOUT: &str = "GRAVITATE_REQUEST_TIMEOUT_SECS";
pub const ENV_STREAM_READ_TIMEOUT: &str = "GRAVITATE_STREAM_READ_TIMEOUT_SECS";
pub const ENV_CACHE_CAPACITY: &str = "GRAVITATE_SIGNATURE_CACHE_CAPACITY";
pub const ENV_CACHE_TTL: &str = "GRAVITATE_SIGNATURE_CACHE_TTL_SECS";
pub const ENV_LOG: &str = "GRAVITATE_LOG";

/// Build a config from process environment on top of defaults.
pub fn from_env() -> Result<BridgeConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from an arbitrary key lookup.
pub fn from_lookup<F>(lookup: F) -> Result<BridgeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BridgeConfig::default();

    if let Some(raw) = lookup(ENV_BASE_URL) {
        config.base_urls = resolve_base_urls(&raw);
    }
    if let Some(raw) = lookup(ENV_DUMMY_SIGNATURE) {
        config.dummy_signature_fallback = parse_flag(&raw);
    }
    if let Some(raw) = lookup(ENV_DEBUG) {
        config.debug_traffic = parse_flag(&raw);
    }
    if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
        config.max_concurrent_requests = parse_number(ENV_MAX_CONCURRENCY, &raw)?;
    }
    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT, &raw)?;
    }
    if let Some(raw) = lookup(ENV_STREAM_READ_TIMEOUT) {
        config.stream_read_timeout_secs = Some(parse_number(ENV_STREAM_READ_TIMEOUT, &raw)?);
    }
    if let Some(raw) = lookup(ENV_CACHE_CAPACITY) {
        config.signature_cache.capacity = parse_number(ENV_CACHE_CAPACITY, &raw)?;
    }
    if let Some(raw) = lookup(ENV_CACHE_TTL) {
        config.signature_cache.ttl_secs = parse_number(ENV_CACHE_TTL, &raw)?;
    }
    if let Some(raw) = lookup(ENV_LOG) {
        if !raw.trim().is_empty() {
            config.log_filter = raw.trim().to_string();
        }
    }

    config.validated()
}

/// Append `/v1internal` unless already present; empty input yields `None`.
pub fn normalize_v1internal_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.ends_with("/v1internal") {
        return Some(trimmed.to_string());
    }
    Some(format!("{}/v1internal", trimmed))
}

fn resolve_base_urls(raw: &str) -> Vec<String> {
    let Some(url) = normalize_v1internal_base_url(raw) else {
        tracing::warn!("{} is empty, using defaults", ENV_BASE_URL);
        return default_base_urls();
    };
    if url::Url::parse(&url).is_err() {
        tracing::warn!("{} is not a valid URL, using defaults", ENV_BASE_URL);
        return default_base_urls();
    }
    tracing::info!("Using custom v1internal base URL: {}", url);
    vec![url]
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_number<T>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::ParseError { field: field.to_string(), message: e.to_string() })
}
