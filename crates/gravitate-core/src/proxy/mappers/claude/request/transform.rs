//! Claude Messages request → v1internal request.

use serde_json::{json, Value};

use super::contents::{build_contents, ContentsContext};
use super::generation_config::build_generation_config;
use super::system_instruction::build_system_instruction;
use super::tools_builder::build_tools;
use crate::proxy::common::map_claude_model_to_gemini;
use crate::proxy::mappers::claude::models::ClaudeRequest;
use crate::proxy::mappers::claude::turn::find_turn_start;
use crate::proxy::mappers::gemini::wrap_request;
use crate::proxy::signature_cache::SignatureCache;
use crate::proxy::upstream::apply_agent_defaults;
use gravitate_types::ProxyError;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Treat messages from this index onward as the current turn instead of
    /// scanning for the boundary.
    pub turn_start_override: Option<usize>,
    /// Put the placeholder token on a current-turn call with no cached signature.
    pub dummy_signature_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct TransformedRequest {
    /// Full v1internal envelope, ready to send.
    pub body: Value,
    /// Backend model the request targets.
    pub mapped_model: String,
}

/// Inner v1internal request, before the project envelope is known.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Bare `{contents, systemInstruction?, generationConfig?, ...}` payload.
    pub inner: Value,
    pub mapped_model: String,
}

impl PreparedRequest {
    /// Wrap for `project_id` and apply the agent metadata.
    pub fn into_envelope(self, project_id: &str) -> TransformedRequest {
        let wrapped = wrap_request(&self.inner, project_id, &self.mapped_model);
        let mut body = wrapped.body;
        apply_agent_defaults(&mut body);
        TransformedRequest { body, mapped_model: wrapped.mapped_model }
    }
}

pub fn transform_claude_request_in(
    claude_req: &ClaudeRequest,
    project_id: &str,
    signatures: &SignatureCache,
    options: RequestOptions,
) -> Result<TransformedRequest, ProxyError> {
    Ok(prepare_claude_request(claude_req, signatures, options)?.into_envelope(project_id))
}

/// Map a Claude request to the bare v1internal payload. No I/O.
pub fn prepare_claude_request(
    claude_req: &ClaudeRequest,
    signatures: &SignatureCache,
    options: RequestOptions,
) -> Result<PreparedRequest, ProxyError> {
    if claude_req.messages.is_empty() {
        return Err(ProxyError::InvalidRequest {
            message: "messages must contain at least one entry".to_string(),
        });
    }

    let mapped_model = map_claude_model_to_gemini(&claude_req.model);
    let turn_start =
        options.turn_start_override.unwrap_or_else(|| find_turn_start(&claude_req.messages));

    tracing::debug!(
        "[Claude-Request] model {} -> {}, {} messages, turn starts at {}",
        claude_req.model,
        mapped_model,
        claude_req.messages.len(),
        turn_start
    );

    let ctx = ContentsContext {
        signatures,
        turn_start,
        dummy_signature_fallback: options.dummy_signature_fallback,
    };
    let contents = build_contents(&claude_req.messages, &ctx);

    let mut inner = json!({ "contents": contents });

    if let Some(system_instruction) = build_system_instruction(&claude_req.system) {
        inner["systemInstruction"] = system_instruction;
    }

    let generation_config = build_generation_config(claude_req);
    if generation_config.as_object().is_some_and(|cfg| !cfg.is_empty()) {
        inner["generationConfig"] = generation_config;
    }

    if let Some(tools) = build_tools(&claude_req.tools) {
        inner["tools"] = tools;
        inner["toolConfig"] = json!({
            "functionCallingConfig": { "mode": "VALIDATED" }
        });
    }

    if let Some(user_id) = claude_req.metadata.as_ref().and_then(|m| m.user_id.as_ref()) {
        inner["sessionId"] = json!(user_id);
    }

    Ok(PreparedRequest { inner, mapped_model })
}
