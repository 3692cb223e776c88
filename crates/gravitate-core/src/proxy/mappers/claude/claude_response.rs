use serde::{Deserialize, Serialize};

use super::content_block::ContentBlock;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub role: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
    pub usage: Usage,
}

impl Usage {
    pub fn from_gemini(usage: &super::gemini_models::UsageMetadata) -> Self {
        let prompt = usage.prompt_token_count.unwrap_or(0);
        let cached = usage.cached_content_token_count.unwrap_or(0);
        Self {
            input_tokens: prompt.saturating_sub(cached),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
            cache_read_input_tokens: (cached > 0).then_some(cached),
        }
    }
}
