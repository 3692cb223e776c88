//! Claude Messages API handlers.

use axum::body::Body;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::upstream_response::{forward_error_response, sse_response};
use super::ProxyState;
use crate::error::AppResult;
use crate::proxy::mappers::claude::{
    create_claude_sse_stream, prepare_claude_request, transform_response, ClaudeRequest,
    GeminiResponse, RequestOptions,
};
use crate::proxy::mappers::gemini::{unwrap_response, validate_image_signatures};
use crate::proxy::upstream::CallOptions;
use gravitate_types::ProxyError;

fn parse_request(body: Value) -> Result<ClaudeRequest, ProxyError> {
    serde_json::from_value(body).map_err(|e| ProxyError::InvalidRequest { message: e.to_string() })
}

/// `POST /v1/messages`
pub async fn handle_messages(
    State(state): State<ProxyState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    if state.config.debug_traffic {
        debug!("[Claude-Request] Raw body: {}", body);
    }
    let claude_req = parse_request(body)?;

    let options = RequestOptions {
        turn_start_override: None,
        dummy_signature_fallback: state.config.dummy_signature_fallback,
    };
    let prepared = prepare_claude_request(&claude_req, &state.signatures, options)?;
    validate_image_signatures(&prepared.mapped_model, &prepared.inner)?;

    let access_token = state.credentials.access_token().await?;
    let project_id = state.credentials.project_id().await?;
    let transformed = prepared.into_envelope(&project_id);

    info!(
        "[Claude-Request] {} -> {} | stream: {} | messages: {}",
        claude_req.model,
        transformed.mapped_model,
        claude_req.stream,
        claude_req.messages.len()
    );
    if state.config.debug_traffic {
        debug!("[Claude-Request] Wrapped body: {}", transformed.body);
    }

    if claude_req.stream {
        let resp = state
            .upstream
            .call_v1_internal(
                "streamGenerateContent",
                &access_token,
                &transformed.body,
                &CallOptions::sse(),
            )
            .await?;
        if !resp.status().is_success() {
            return Ok(forward_error_response(resp).await);
        }

        let stream = create_claude_sse_stream(
            resp.bytes_stream(),
            state.signatures.clone(),
            transformed.mapped_model,
            state.stream_read_timeout(),
        );
        return Ok(sse_response(Body::from_stream(stream)));
    }

    let resp = state
        .upstream
        .call_v1_internal("generateContent", &access_token, &transformed.body, &CallOptions::default())
        .await?;
    if !resp.status().is_success() {
        return Ok(forward_error_response(resp).await);
    }

    let payload: Value = resp.json().await?;
    if state.config.debug_traffic {
        debug!("[Claude-Response] Upstream body: {}", payload);
    }
    let gemini_response: GeminiResponse = serde_json::from_value(unwrap_response(&payload))?;
    let claude_response =
        transform_response(&gemini_response, &state.signatures, &transformed.mapped_model);

    Ok(Json(claude_response).into_response())
}

/// `POST /v1/messages/count_tokens`
pub async fn handle_count_tokens(
    State(state): State<ProxyState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let claude_req = parse_request(body)?;
    let prepared =
        prepare_claude_request(&claude_req, &state.signatures, RequestOptions::default())?;
    let access_token = state.credentials.access_token().await?;

    let resp = state
        .upstream
        .count_tokens(&access_token, &prepared.mapped_model, &prepared.inner["contents"])
        .await?;
    if !resp.status().is_success() {
        return Ok(forward_error_response(resp).await);
    }

    let payload: Value = resp.json().await?;
    let total = unwrap_response(&payload)
        .get("totalTokens")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Ok(Json(json!({ "input_tokens": total })).into_response())
}
