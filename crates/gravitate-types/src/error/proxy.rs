//! Proxy-related errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const IMAGE_SIGNATURE_HINT: &str = "You must pass back the exact thoughtSignature/thought_signature from the previous Gemini 3 Pro Image response when including model-generated images in contents history.";

/// Errors that can occur during proxy operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// Request validation failed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A model-authored image part in history has no thought signature
    #[error("Image part is missing a thought_signature in content position {content_index}, part position {part_index}.")]
    ImageSignatureMissing { content_index: usize, part_index: usize },

    /// Model not present in the upstream catalog
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// All endpoints failed at the transport level
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Request or response body had an unexpected shape
    #[error("Transform error: {message}")]
    Transform { message: String },

    /// Stream error during SSE transmission
    #[error("Stream error: {message}")]
    StreamError { message: String },

    /// Access token or project id could not be obtained
    #[error("Credential error: {message}")]
    Credentials { message: String },
}

impl ProxyError {
    /// Check if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::ImageSignatureMissing { .. }
                | Self::ModelNotFound { .. }
        )
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } | Self::ImageSignatureMissing { .. } => 400,
            Self::ModelNotFound { .. } => 404,
            Self::StreamError { .. } => 502,
            Self::Upstream { .. } | Self::Transform { .. } | Self::Credentials { .. } => 500,
        }
    }

    /// Google-style status string for the error envelope.
    pub fn status(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } | Self::ImageSignatureMissing { .. } => "INVALID_ARGUMENT",
            Self::ModelNotFound { .. } => "NOT_FOUND",
            Self::StreamError { .. } | Self::Upstream { .. } => "UNAVAILABLE",
            Self::Transform { .. } | Self::Credentials { .. } => "INTERNAL",
        }
    }

    /// Renders `{ "error": { code, status, message, details? } }`.
    pub fn to_error_body(&self) -> Value {
        let mut error = json!({
            "code": self.http_status_code(),
            "status": self.status(),
            "message": self.to_string(),
        });
        if let Self::ImageSignatureMissing { .. } = self {
            error["details"] = json!({ "hint": IMAGE_SIGNATURE_HINT });
        }
        json!({ "error": error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            ProxyError::ImageSignatureMissing { content_index: 0, part_index: 0 }
                .http_status_code(),
            400
        );
        assert_eq!(ProxyError::Upstream { message: "down".to_string() }.http_status_code(), 500);
        assert_eq!(ProxyError::Transform { message: "bad".to_string() }.http_status_code(), 500);
        assert_eq!(ProxyError::ModelNotFound { model: "x".to_string() }.http_status_code(), 404);
    }

    #[test]
    fn test_image_error_body() {
        let body = ProxyError::ImageSignatureMissing { content_index: 1, part_index: 2 }
            .to_error_body();

        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
        assert_eq!(
            body["error"]["message"],
            "Image part is missing a thought_signature in content position 1, part position 2."
        );
        assert_eq!(body["error"]["details"]["hint"], IMAGE_SIGNATURE_HINT);
    }

    #[test]
    fn test_plain_error_body_has_no_details() {
        let body = ProxyError::Transform { message: "oops".to_string() }.to_error_body();
        assert!(body["error"].get("details").is_none());
        assert_eq!(body["error"]["message"], "Transform error: oops");
    }
}
