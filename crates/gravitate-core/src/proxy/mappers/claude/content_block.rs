//! Claude content block types for message content representation.

use serde::{Deserialize, Serialize};

/// Content block types for Claude API messages.
///
/// Block types this bridge does not translate deserialize as [`ContentBlock::Unknown`]
/// and are skipped during mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Plain text content block.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },

    /// Thinking/reasoning content block (extended thinking feature).
    #[serde(rename = "thinking")]
    Thinking {
        /// The thinking/reasoning text.
        thinking: String,
        /// Continuity signature issued with the thought.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },

    /// Image content block with base64-encoded data.
    #[serde(rename = "image")]
    Image {
        /// The image source containing type, media type, and data.
        source: ImageSource,
        /// Continuity token for model-authored images.
        #[serde(default, skip_serializing_if = "Option::is_none", alias = "thoughtSignature")]
        thought_signature: Option<String>,
    },

    /// Tool use request from the model.
    #[serde(rename = "tool_use")]
    ToolUse {
        /// Unique identifier for this tool use.
        id: String,
        /// Name of the tool being called.
        name: String,
        /// Input arguments for the tool.
        #[serde(default)]
        input: serde_json::Value,
    },

    /// Result from a tool execution.
    #[serde(rename = "tool_result")]
    ToolResult {
        /// ID of the tool use this result corresponds to.
        tool_use_id: String,
        /// The result content from the tool (string or block array).
        #[serde(default)]
        content: serde_json::Value,
        /// Whether the tool execution resulted in an error.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },

    /// Any block type the bridge does not translate.
    #[serde(other)]
    Unknown,
}

/// Source information for image content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSource {
    /// The source type (e.g., "base64").
    #[serde(rename = "type")]
    pub source_type: String,
    /// MIME type of the image (e.g., "image/png").
    pub media_type: String,
    /// Base64-encoded image data.
    pub data: String,
}

impl ContentBlock {
    pub fn is_tool_result(&self) -> bool {
        matches!(self, ContentBlock::ToolResult { .. })
    }
}
