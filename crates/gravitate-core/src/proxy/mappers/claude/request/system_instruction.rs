//! System instruction building.

use super::super::models::SystemPrompt;
use serde_json::{json, Value};

pub fn build_system_instruction(system: &Option<SystemPrompt>) -> Option<Value> {
    let parts: Vec<Value> = match system.as_ref()? {
        SystemPrompt::String(text) => {
            if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![json!({"text": text})]
            }
        },
        SystemPrompt::Array(blocks) => blocks
            .iter()
            .filter(|block| block.block_type == "text" && !block.text.trim().is_empty())
            .map(|block| json!({"text": block.text}))
            .collect(),
    };

    if parts.is_empty() {
        return None;
    }

    Some(json!({
        "role": "user",
        "parts": parts
    }))
}
