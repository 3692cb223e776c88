//! Unified error types for Gravitate Core.

use gravitate_types::{ConfigError, ProxyError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all Gravitate operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Typed proxy failure carrying its HTTP mapping.
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Collapse into a [`ProxyError`] for the client-facing error envelope.
    pub fn into_proxy_error(self) -> ProxyError {
        match self {
            AppError::Proxy(e) => e,
            AppError::Network(e) => ProxyError::Upstream { message: e.to_string() },
            AppError::Json(e) => ProxyError::Transform { message: e.to_string() },
            AppError::Config(e) => ProxyError::Transform { message: e.to_string() },
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for Gravitate operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_transform() {
        let err: AppError = match serde_json::from_str::<serde_json::Value>("{") {
            Ok(_) => panic!("expected parse failure"),
            Err(e) => e.into(),
        };
        let proxy = err.into_proxy_error();
        assert!(matches!(proxy, ProxyError::Transform { .. }));
        assert_eq!(proxy.http_status_code(), 500);
    }

    #[test]
    fn test_proxy_error_passes_through() {
        let err = AppError::from(ProxyError::InvalidRequest { message: "bad".to_string() });
        assert_eq!(err.to_string(), "Invalid request: bad");
        assert_eq!(err.into_proxy_error().http_status_code(), 400);
    }
}
