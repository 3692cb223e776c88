//! Generation config building.

use super::super::models::ClaudeRequest;
use serde_json::{json, Value};

/// Headroom added on top of the thinking budget when the client's
/// `max_tokens` would not leave room for a visible answer.
const THINKING_OVERHEAD: u32 = 4096;

pub fn build_generation_config(claude_req: &ClaudeRequest) -> Value {
    let mut config = json!({});

    if let Some(thinking) = &claude_req.thinking {
        if thinking.type_ == "enabled" {
            let mut thinking_config = json!({"includeThoughts": true});
            if let Some(budget) = thinking.budget_tokens {
                thinking_config["thinkingBudget"] = json!(budget);
            }
            config["thinkingConfig"] = thinking_config;
        }
    }

    if let Some(temp) = claude_req.temperature {
        config["temperature"] = json!(temp);
    }
    if let Some(top_p) = claude_req.top_p {
        config["topP"] = json!(top_p);
    }
    if let Some(top_k) = claude_req.top_k {
        config["topK"] = json!(top_k);
    }
    if let Some(stop) = claude_req.stop_sequences.as_ref().filter(|s| !s.is_empty()) {
        config["stopSequences"] = json!(stop);
    }

    let mut max_tokens = claude_req.max_tokens;
    if let Some(budget) = config
        .get("thinkingConfig")
        .and_then(|t| t.get("thinkingBudget"))
        .and_then(Value::as_u64)
    {
        let budget = budget as u32;
        if let Some(current) = max_tokens {
            if current <= budget {
                tracing::info!(
                    "[Generation-Config] Bumping maxOutputTokens from {} to {} for thinking budget {}",
                    current,
                    budget + THINKING_OVERHEAD,
                    budget
                );
                max_tokens = Some(budget + THINKING_OVERHEAD);
            }
        }
    }
    if let Some(max_tokens) = max_tokens {
        config["maxOutputTokens"] = json!(max_tokens);
    }

    config
}
