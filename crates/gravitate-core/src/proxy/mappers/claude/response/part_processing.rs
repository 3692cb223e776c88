// Part processing helpers for NonStreamingProcessor

use super::super::models::*;
use crate::proxy::common::random_id::generate_random_id;
use crate::proxy::signature_cache::SignatureCache;

pub struct PartProcessingContext<'a> {
    pub content_blocks: &'a mut Vec<ContentBlock>,
    pub text_builder: &'a mut String,
    pub thinking_builder: &'a mut String,
    pub thinking_signature: &'a mut Option<String>,
    pub has_tool_call: &'a mut bool,
    pub signatures: &'a SignatureCache,
}

/// Backend id of the call, or a generated `{name}-{random}` id.
pub(crate) fn tool_use_id(fc: &FunctionCall) -> String {
    fc.id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}-{}", fc.name, generate_random_id()))
}

impl PartProcessingContext<'_> {
    pub fn process_part(&mut self, part: &GeminiPart) {
        let signature = part.signature().map(str::to_string);

        if let Some(fc) = &part.function_call {
            self.process_function_call(fc, signature);
            return;
        }

        if let Some(text) = &part.text {
            self.process_text(text, part.thought.unwrap_or(false), signature);
        }

        if let Some(img) = &part.inline_data {
            self.process_inline_data(img);
        }
    }

    fn process_function_call(&mut self, fc: &FunctionCall, signature: Option<String>) {
        self.flush_thinking();
        self.flush_text();

        *self.has_tool_call = true;

        let tool_id = tool_use_id(fc);
        if let Some(sig) = signature {
            tracing::debug!(
                "[Claude-Response] Caching signature (len: {}) for tool_use {}",
                sig.len(),
                tool_id
            );
            self.signatures.put(&tool_id, sig);
        }

        self.content_blocks.push(ContentBlock::ToolUse {
            id: tool_id,
            name: fc.name.clone(),
            input: fc.args.clone().unwrap_or_else(|| serde_json::json!({})),
        });
    }

    fn process_text(&mut self, text: &str, is_thought: bool, signature: Option<String>) {
        if is_thought {
            self.flush_text();
            self.thinking_builder.push_str(text);
            if signature.is_some() {
                *self.thinking_signature = signature;
            }
            return;
        }

        if text.is_empty() {
            return;
        }
        self.flush_thinking();
        self.text_builder.push_str(text);
    }

    fn process_inline_data(&mut self, img: &InlineData) {
        self.flush_thinking();

        if !img.data.is_empty() {
            let markdown_img = format!("![image](data:{};base64,{})", img.mime_type, img.data);
            self.text_builder.push_str(&markdown_img);
            self.flush_text();
        }
    }

    pub fn flush_text(&mut self) {
        if self.text_builder.is_empty() {
            return;
        }
        self.content_blocks.push(ContentBlock::Text { text: std::mem::take(self.text_builder) });
    }

    pub fn flush_thinking(&mut self) {
        if self.thinking_builder.is_empty() && self.thinking_signature.is_none() {
            return;
        }
        self.content_blocks.push(ContentBlock::Thinking {
            thinking: std::mem::take(self.thinking_builder),
            signature: self.thinking_signature.take(),
        });
    }
}
