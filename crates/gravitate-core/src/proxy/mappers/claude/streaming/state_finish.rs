use bytes::Bytes;
use serde_json::{json, Value};

use super::state::StreamingState;
use crate::proxy::mappers::claude::models::*;
use crate::proxy::mappers::claude::response::stop_reason;

impl StreamingState {
    pub fn emit_finish(
        &mut self,
        finish_reason: Option<&str>,
        usage_metadata: Option<&UsageMetadata>,
    ) -> Vec<Bytes> {
        let mut chunks = Vec::new();
        if self.message_stop_sent {
            return chunks;
        }

        chunks.extend(self.end_block());

        let usage = usage_metadata.map(Usage::from_gemini).unwrap_or_default();
        chunks.push(self.emit(
            "message_delta",
            json!({
                "type": "message_delta",
                "delta": {
                    "stop_reason": stop_reason(self.used_tool, finish_reason),
                    "stop_sequence": null
                },
                "usage": usage
            }),
        ));

        chunks.push(self.emit("message_stop", json!({ "type": "message_stop" })));
        self.message_stop_sent = true;

        chunks
    }

    /// Close out a stream that ended without a finish reason.
    pub fn emit_force_stop(&mut self) -> Vec<Bytes> {
        if self.message_stop_sent {
            return vec![];
        }
        let mut chunks = Vec::new();
        if !self.message_start_sent {
            chunks.push(self.emit_message_start(&Value::Null));
        }
        chunks.extend(self.emit_finish(None, None));
        chunks
    }
}
