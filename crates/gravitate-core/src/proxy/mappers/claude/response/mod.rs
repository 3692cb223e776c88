// Claude non-streaming response transformation (Gemini → Claude)

mod part_processing;

use super::models::*;
use crate::proxy::common::random_id::generate_random_id;
use crate::proxy::signature_cache::SignatureCache;
pub(crate) use part_processing::tool_use_id;
use part_processing::PartProcessingContext;

/// Non-streaming response processor
pub struct NonStreamingProcessor<'a> {
    content_blocks: Vec<ContentBlock>,
    text_builder: String,
    thinking_builder: String,
    thinking_signature: Option<String>,
    has_tool_call: bool,
    signatures: &'a SignatureCache,
}

impl<'a> NonStreamingProcessor<'a> {
    pub fn new(signatures: &'a SignatureCache) -> Self {
        Self {
            content_blocks: Vec::new(),
            text_builder: String::new(),
            thinking_builder: String::new(),
            thinking_signature: None,
            has_tool_call: false,
            signatures,
        }
    }

    pub fn process(&mut self, gemini_response: &GeminiResponse, model_name: &str) -> ClaudeResponse {
        let parts = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default();

        for part in parts {
            self.context().process_part(part);
        }

        let mut ctx = self.context();
        ctx.flush_thinking();
        ctx.flush_text();

        self.build_response(gemini_response, model_name)
    }

    fn context(&mut self) -> PartProcessingContext<'_> {
        PartProcessingContext {
            content_blocks: &mut self.content_blocks,
            text_builder: &mut self.text_builder,
            thinking_builder: &mut self.thinking_builder,
            thinking_signature: &mut self.thinking_signature,
            has_tool_call: &mut self.has_tool_call,
            signatures: self.signatures,
        }
    }

    fn build_response(&self, gemini_response: &GeminiResponse, model_name: &str) -> ClaudeResponse {
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.finish_reason.as_deref());

        let usage =
            gemini_response.usage_metadata.as_ref().map(Usage::from_gemini).unwrap_or_default();

        ClaudeResponse {
            id: gemini_response
                .response_id
                .clone()
                .unwrap_or_else(|| format!("msg_{}", generate_random_id())),
            type_: "message".to_string(),
            role: "assistant".to_string(),
            model: gemini_response.model_version.clone().unwrap_or_else(|| model_name.to_string()),
            content: self.content_blocks.clone(),
            stop_reason: stop_reason(self.has_tool_call, finish_reason).to_string(),
            stop_sequence: None,
            usage,
        }
    }
}

pub(crate) fn stop_reason(has_tool_call: bool, finish_reason: Option<&str>) -> &'static str {
    if has_tool_call {
        "tool_use"
    } else if finish_reason == Some("MAX_TOKENS") {
        "max_tokens"
    } else {
        "end_turn"
    }
}

/// Transform Gemini response to Claude response, recording every
/// function-call signature in `signatures`.
pub fn transform_response(
    gemini_response: &GeminiResponse,
    signatures: &SignatureCache,
    model_name: &str,
) -> ClaudeResponse {
    NonStreamingProcessor::new(signatures).process(gemini_response, model_name)
}
