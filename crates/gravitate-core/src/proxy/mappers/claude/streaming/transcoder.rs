//! Push-based Gemini SSE → Claude SSE transcoding.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::{json, Value};

use super::{PartProcessor, StreamingState};
use crate::proxy::common::sse::{event_data, SseFramer};
use crate::proxy::mappers::claude::models::*;
use crate::proxy::signature_cache::SignatureCache;
use gravitate_types::ProxyError;

pub struct ClaudeStreamTranscoder {
    framer: SseFramer,
    state: StreamingState,
    signatures: Arc<SignatureCache>,
}

impl ClaudeStreamTranscoder {
    pub fn new(signatures: Arc<SignatureCache>, model_name: impl Into<String>) -> Self {
        Self { framer: SseFramer::new(), state: StreamingState::new(model_name), signatures }
    }

    /// Feed upstream bytes; returns the Claude events completed by them, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Bytes>, ProxyError> {
        let mut out = Vec::new();
        for event in self.framer.push(chunk)? {
            out.extend(self.process_event(&event));
        }
        Ok(out)
    }

    /// End of upstream. A buffered partial event is discarded.
    pub fn finish(&mut self) -> Vec<Bytes> {
        if let Some(partial) = self.framer.finish() {
            tracing::warn!(
                "[Claude-SSE] Discarding incomplete trailing event ({} bytes)",
                partial.len()
            );
        }
        self.state.emit_force_stop()
    }

    fn process_event(&mut self, block: &str) -> Vec<Bytes> {
        if self.state.message_stop_sent {
            tracing::debug!("[Claude-SSE] Ignoring event after message_stop");
            return Vec::new();
        }
        let Some(data) = event_data(block) else {
            return Vec::new();
        };
        let data = data.trim();
        if data.is_empty() {
            return Vec::new();
        }
        if data == "[DONE]" {
            return self.state.emit_force_stop();
        }

        let json_value: Value = match serde_json::from_str(data) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    "[Claude-SSE] SSE JSON parse error: {} | data: {}",
                    e,
                    data.chars().take(200).collect::<String>()
                );
                return Vec::new();
            },
        };
        let raw_json = json_value.get("response").unwrap_or(&json_value);

        if let Some(error) = raw_json.get("error") {
            tracing::error!("[Claude-SSE] Upstream error in SSE stream: {}", error);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown upstream error");
            let event = self.state.emit(
                "error",
                json!({
                    "type": "error",
                    "error": {"type": "overloaded_error", "message": format!("Upstream error: {message}")}
                }),
            );
            // An error event ends the Claude stream; nothing follows it.
            self.state.message_stop_sent = true;
            return vec![event];
        }

        let mut chunks = Vec::new();
        if !self.state.message_start_sent {
            chunks.push(self.state.emit_message_start(raw_json));
        }

        let candidate = raw_json.get("candidates").and_then(|c| c.get(0));
        if let Some(parts) = candidate
            .and_then(|cand| cand.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
        {
            for part_value in parts {
                match serde_json::from_value::<GeminiPart>(part_value.clone()) {
                    Ok(part) => {
                        let mut processor = PartProcessor::new(&mut self.state, &self.signatures);
                        chunks.extend(processor.process(&part));
                    },
                    Err(e) => {
                        tracing::warn!("[Claude-SSE] Failed to deserialize GeminiPart: {}", e);
                    },
                }
            }
        }

        let finish_reason = candidate
            .and_then(|cand| cand.get("finishReason").or_else(|| cand.get("finish_reason")))
            .and_then(Value::as_str);
        if let Some(finish_reason) = finish_reason {
            let usage = raw_json
                .get("usageMetadata")
                .or_else(|| raw_json.get("usage_metadata"))
                .and_then(|u| serde_json::from_value::<UsageMetadata>(u.clone()).ok());
            tracing::info!("[Claude-SSE] Stream completed | Reason: {}", finish_reason);
            chunks.extend(self.state.emit_finish(Some(finish_reason), usage.as_ref()));
        }

        chunks
    }
}
