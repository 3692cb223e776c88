//! Message → Gemini `contents` conversion with turn-scoped signatures.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::super::models::{ContentBlock, Message, MessageContent};
use super::tool_result_handler::build_tool_result_parts;
use crate::proxy::signature_cache::SignatureCache;
use crate::proxy::signature_metrics::record_dummy_signature;

/// Placeholder token the backend accepts in place of a real thought signature.
pub const DUMMY_SIGNATURE: &str = "skip_thought_signature_validator";

pub(super) struct ContentsContext<'a> {
    pub signatures: &'a SignatureCache,
    pub turn_start: usize,
    pub dummy_signature_fallback: bool,
}

pub(super) fn build_contents(messages: &[Message], ctx: &ContentsContext<'_>) -> Vec<Value> {
    let tool_id_to_name = collect_tool_names(messages);

    let contents: Vec<Value> = messages
        .iter()
        .enumerate()
        .filter_map(|(index, msg)| {
            let role = if msg.role == "assistant" || msg.role == "model" { "model" } else { "user" };
            let in_current_turn = index >= ctx.turn_start;
            let parts = build_parts(msg, role, in_current_turn, &tool_id_to_name, ctx);
            if parts.is_empty() {
                tracing::debug!("[Request-Contents] Dropping message {} with no mappable parts", index);
                return None;
            }
            Some(json!({"role": role, "parts": parts}))
        })
        .collect();

    merge_adjacent_roles(contents)
}

fn collect_tool_names(messages: &[Message]) -> HashMap<String, String> {
    messages
        .iter()
        .flat_map(Message::blocks)
        .filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, .. } => Some((id.clone(), name.clone())),
            _ => None,
        })
        .collect()
}

fn build_parts(
    msg: &Message,
    role: &str,
    in_current_turn: bool,
    tool_id_to_name: &HashMap<String, String>,
    ctx: &ContentsContext<'_>,
) -> Vec<Value> {
    let blocks = match &msg.content {
        MessageContent::String(text) => {
            if text.trim().is_empty() {
                return Vec::new();
            }
            return vec![json!({"text": text})];
        },
        MessageContent::Array(blocks) => blocks,
    };

    let mut parts = Vec::with_capacity(blocks.len());
    let mut placeholder_used = false;

    for block in blocks {
        match block {
            ContentBlock::Text { text } => {
                if !text.is_empty() && text != "(no content)" {
                    parts.push(json!({"text": text}));
                }
            },
            ContentBlock::Thinking { thinking, signature } => {
                let signature = signature.as_deref().map(str::trim).filter(|s| !s.is_empty());
                match signature {
                    Some(sig) if role == "model" && in_current_turn && !thinking.is_empty() => {
                        parts.push(json!({
                            "text": thinking,
                            "thought": true,
                            "thoughtSignature": sig
                        }));
                    },
                    _ => {
                        tracing::debug!(
                            "[Request-Contents] Dropping thinking block (signed: {}, current turn: {})",
                            signature.is_some(),
                            in_current_turn
                        );
                    },
                }
            },
            ContentBlock::Image { source, thought_signature } => {
                let mut part = json!({
                    "inlineData": {
                        "mimeType": source.media_type,
                        "data": source.data
                    }
                });
                if let Some(sig) =
                    thought_signature.as_deref().map(str::trim).filter(|s| !s.is_empty())
                {
                    part["thoughtSignature"] = json!(sig);
                }
                parts.push(part);
            },
            ContentBlock::ToolUse { id, name, input } => {
                let mut part = json!({
                    "functionCall": {
                        "name": name,
                        "args": input,
                        "id": id
                    }
                });

                if in_current_turn {
                    if let Some(sig) = ctx.signatures.get(id) {
                        part["thoughtSignature"] = json!(sig);
                    } else if ctx.dummy_signature_fallback && !placeholder_used {
                        placeholder_used = true;
                        tracing::debug!(
                            "[Request-Contents] No cached signature for tool_use {}, using placeholder",
                            id
                        );
                        record_dummy_signature();
                        part["thoughtSignature"] = json!(DUMMY_SIGNATURE);
                    }
                }

                parts.push(part);
            },
            ContentBlock::ToolResult { tool_use_id, content, is_error } => {
                let func_name =
                    tool_id_to_name.get(tool_use_id).cloned().unwrap_or_else(|| tool_use_id.clone());
                parts.extend(build_tool_result_parts(tool_use_id, content, *is_error, func_name));
            },
            ContentBlock::Unknown => {},
        }
    }

    parts
}

/// Merge consecutive contents that share a role into one.
pub fn merge_adjacent_roles(contents: Vec<Value>) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(contents.len());

    for content in contents {
        let same_role = merged
            .last()
            .map(|last| last.get("role") == content.get("role"))
            .unwrap_or(false);

        if same_role {
            if let (Some(last), Some(new_parts)) =
                (merged.last_mut(), content.get("parts").and_then(Value::as_array))
            {
                if let Some(parts) = last.get_mut("parts").and_then(Value::as_array_mut) {
                    parts.extend(new_parts.iter().cloned());
                    continue;
                }
            }
        }
        merged.push(content);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adjacent_roles() {
        let contents = vec![
            json!({"role": "user", "parts": [{"text": "a"}]}),
            json!({"role": "user", "parts": [{"text": "b"}]}),
            json!({"role": "model", "parts": [{"text": "c"}]}),
        ];
        let merged = merge_adjacent_roles(contents);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0]["parts"].as_array().map(Vec::len), Some(2));
    }
}
