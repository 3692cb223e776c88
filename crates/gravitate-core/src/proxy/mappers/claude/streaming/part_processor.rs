use bytes::Bytes;
use serde_json::json;

use super::{BlockType, StreamingState};
use crate::proxy::mappers::claude::models::*;
use crate::proxy::mappers::claude::response::tool_use_id;
use crate::proxy::signature_cache::SignatureCache;

pub struct PartProcessor<'a> {
    state: &'a mut StreamingState,
    signatures: &'a SignatureCache,
}

impl<'a> PartProcessor<'a> {
    pub fn new(state: &'a mut StreamingState, signatures: &'a SignatureCache) -> Self {
        Self { state, signatures }
    }

    pub fn process(&mut self, part: &GeminiPart) -> Vec<Bytes> {
        let signature = part.signature().map(str::to_string);

        if let Some(fc) = &part.function_call {
            return self.process_function_call(fc, signature);
        }

        let mut chunks = Vec::new();
        if let Some(text) = &part.text {
            if part.thought.unwrap_or(false) {
                chunks.extend(self.process_thinking(text, signature));
            } else {
                chunks.extend(self.process_text(text));
            }
        }

        if let Some(img) = &part.inline_data {
            if !img.data.is_empty() {
                let markdown_img = format!("![image](data:{};base64,{})", img.mime_type, img.data);
                chunks.extend(self.process_text(&markdown_img));
            }
        }

        chunks
    }

    fn process_thinking(&mut self, text: &str, signature: Option<String>) -> Vec<Bytes> {
        let mut chunks = Vec::new();

        if self.state.current_block_type() != BlockType::Thinking {
            chunks.extend(
                self.state.start_block(
                    BlockType::Thinking,
                    json!({ "type": "thinking", "thinking": "" }),
                ),
            );
        }

        if !text.is_empty() {
            chunks.push(self.state.emit_delta("thinking_delta", json!({ "thinking": text })));
        }

        self.state.store_signature(signature);
        chunks
    }

    fn process_text(&mut self, text: &str) -> Vec<Bytes> {
        let mut chunks = Vec::new();
        if text.is_empty() {
            return chunks;
        }

        if self.state.current_block_type() != BlockType::Text {
            chunks.extend(
                self.state.start_block(BlockType::Text, json!({ "type": "text", "text": "" })),
            );
        }

        chunks.push(self.state.emit_delta("text_delta", json!({ "text": text })));
        chunks
    }

    fn process_function_call(
        &mut self,
        fc: &FunctionCall,
        signature: Option<String>,
    ) -> Vec<Bytes> {
        let mut chunks = Vec::new();

        self.state.mark_tool_used();

        let tool_id = tool_use_id(fc);
        if let Some(sig) = signature {
            tracing::debug!(
                "[Claude-SSE] Captured thought_signature for function call {} (length: {})",
                tool_id,
                sig.len()
            );
            self.signatures.put(&tool_id, sig);
        }

        let tool_use = json!({
            "type": "tool_use",
            "id": tool_id,
            "name": fc.name,
            "input": {}
        });
        chunks.extend(self.state.start_block(BlockType::Function, tool_use));

        let args = fc.args.clone().unwrap_or_else(|| json!({}));
        let json_str = serde_json::to_string(&args).unwrap_or_else(|_| "{}".to_string());
        chunks.push(self.state.emit_delta("input_json_delta", json!({ "partial_json": json_str })));

        chunks.extend(self.state.end_block());
        chunks
    }
}
