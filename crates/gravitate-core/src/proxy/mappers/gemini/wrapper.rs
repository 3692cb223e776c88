// Gemini v1internal envelope wrap/unwrap
use serde_json::{json, Value};

use crate::proxy::common::map_claude_model_to_gemini;

/// Output budget applied when the caller sets none.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 65535;

#[derive(Debug, Clone)]
pub struct WrappedRequest {
    pub body: Value,
    pub mapped_model: String,
}

/// Wrap a Gemini-shaped payload into the v1internal envelope.
///
/// An already-enveloped body (one carrying `request`) is re-wrapped from its
/// inner payload, so wrapping is idempotent.
pub fn wrap_request(body: &Value, project_id: &str, model_name: &str) -> WrappedRequest {
    let mapped_model = map_claude_model_to_gemini(model_name);

    let mut inner_request = match body.get("request") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => body.clone(),
    };
    apply_generation_defaults(&mut inner_request);

    tracing::debug!("[Gemini-Wrap] model='{}', mapped='{}'", model_name, mapped_model);

    let wrapped = json!({
        "project": project_id,
        "requestId": format!("agent-{}", uuid::Uuid::new_v4()),
        "request": inner_request,
        "model": mapped_model,
    });

    WrappedRequest { body: wrapped, mapped_model }
}

fn apply_generation_defaults(inner_request: &mut Value) {
    let Some(obj) = inner_request.as_object_mut() else {
        return;
    };
    let gen_config = obj.entry("generationConfig").or_insert_with(|| json!({}));
    if let Some(gen_obj) = gen_config.as_object_mut() {
        gen_obj
            .entry("maxOutputTokens")
            .or_insert_with(|| json!(DEFAULT_MAX_OUTPUT_TOKENS));
    }
}

/// Strip the envelope: `payload.response` when present, else the payload itself.
pub fn unwrap_response(response: &Value) -> Value {
    response.get("response").unwrap_or(response).clone()
}

#[cfg(test)]
#[path = "wrapper_tests.rs"]
mod wrapper_tests;
