//! Typed error definitions for Gravitate.
//!
//! Errors are serializable for API responses, displayable for logging and
//! matchable by variant.

mod config;
mod proxy;

pub use config::ConfigError;
pub use proxy::ProxyError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a proxy operation error
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = TypedError::Proxy(ProxyError::ModelNotFound { model: "gemini-x".to_string() });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Proxy"));
        assert!(json.contains("gemini-x"));

        let deserialized: TypedError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ProxyError::ImageSignatureMissing { content_index: 1, part_index: 0 };

        let msg = format!("{}", err);
        assert!(msg.contains("content position 1"));
        assert!(msg.contains("part position 0"));
    }
}
