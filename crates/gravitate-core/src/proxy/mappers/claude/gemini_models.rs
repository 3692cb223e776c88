//! Gemini API model types for request/response handling.
//!
//! These are the canonical forms. Upstream and native clients mix
//! `camelCase` and `snake_case` spellings; serde aliases fold both into one
//! representation on ingress and only `camelCase` is ever emitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini content structure containing role and parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    /// The role of the content author (e.g., "user", "model").
    #[serde(default)]
    pub role: String,
    /// The parts that make up this content.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A single part within Gemini content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Optional text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether this is a thought/reasoning part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// Continuity token for this part.
    #[serde(
        rename = "thoughtSignature",
        alias = "thought_signature",
        skip_serializing_if = "Option::is_none"
    )]
    pub thought_signature: Option<String>,
    /// Function call request from the model.
    #[serde(rename = "functionCall", alias = "function_call", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// Response to a function call.
    #[serde(
        rename = "functionResponse",
        alias = "function_response",
        skip_serializing_if = "Option::is_none"
    )]
    pub function_response: Option<FunctionResponse>,
    /// Inline binary data (images, audio, etc.).
    #[serde(rename = "inlineData", alias = "inline_data", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }

    /// Signature with surrounding whitespace removed; blank counts as absent.
    pub fn signature(&self) -> Option<&str> {
        self.thought_signature.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Function call request from the Gemini model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to call.
    pub name: String,
    /// Optional arguments to pass to the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    /// Optional unique identifier for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Response to a function call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Name of the function that was called.
    pub name: String,
    /// The response data from the function.
    pub response: Value,
    /// Optional identifier matching the original call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Inline binary data with MIME type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type of the data (e.g., "image/png").
    #[serde(rename = "mimeType", alias = "mime_type", default)]
    pub mime_type: String,
    /// Base64-encoded binary data.
    #[serde(default)]
    pub data: String,
}

/// Response from the Gemini API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiResponse {
    /// List of response candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    /// Token usage metadata.
    #[serde(rename = "usageMetadata", alias = "usage_metadata", default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Version of the model that generated this response.
    #[serde(rename = "modelVersion", alias = "model_version", default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Unique identifier for this response.
    #[serde(rename = "responseId", alias = "response_id", default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

/// A single candidate response from Gemini.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// The content of this candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
    /// Reason why generation finished.
    #[serde(rename = "finishReason", alias = "finish_reason", default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage metadata from Gemini API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(rename = "promptTokenCount", alias = "prompt_token_count", default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u32>,
    /// Number of tokens in the response candidates.
    #[serde(rename = "candidatesTokenCount", alias = "candidates_token_count", default, skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u32>,
    /// Total token count (prompt + candidates).
    #[serde(rename = "totalTokenCount", alias = "total_token_count", default, skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u32>,
    /// Number of tokens served from cache.
    #[serde(rename = "cachedContentTokenCount", alias = "cached_content_token_count", default, skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_spellings_normalize() {
        let part: GeminiPart = serde_json::from_value(json!({
            "inline_data": {"mime_type": "image/png", "data": "AAA"},
            "thought_signature": "  sig  "
        }))
        .unwrap_or_default();

        let inline = part.inline_data.clone().unwrap_or_default();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(part.signature(), Some("sig"));

        let out = serde_json::to_value(&part).unwrap_or_default();
        assert!(out.get("inlineData").is_some());
        assert!(out.get("thoughtSignature").is_some());
        assert!(out.get("inline_data").is_none());
    }
}
