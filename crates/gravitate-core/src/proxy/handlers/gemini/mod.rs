//! Native Gemini API handlers.

mod models;

pub use models::{build_model_list, handle_count_tokens, handle_get_model, handle_list_models};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{debug, info};

use super::upstream_response::{forward_error_response, passthrough_response};
use super::ProxyState;
use crate::error::AppResult;
use crate::proxy::common::{map_claude_model_to_gemini, sanitize_upstream_headers};
use crate::proxy::mappers::gemini::{
    create_unwrap_stream, unwrap_response, validate_image_signatures, wrap_request,
};
use crate::proxy::upstream::CallOptions;
use gravitate_types::ProxyError;

/// `POST /v1beta/models/{model}:{method}`
pub async fn handle_generate(
    State(state): State<ProxyState>,
    Path(model_action): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let (model_name, method) = match model_action.rsplit_once(':') {
        Some((m, action)) => (m.to_string(), action.to_string()),
        None => (model_action, "generateContent".to_string()),
    };

    info!("[Gemini] Request: {}/{}", model_name, method);

    if method != "generateContent" && method != "streamGenerateContent" {
        return Err(ProxyError::InvalidRequest { message: format!("Unsupported method: {}", method) }
            .into());
    }
    let is_stream = method == "streamGenerateContent";

    if state.config.debug_traffic {
        debug!("[Gemini] Raw body: {}", body);
    }

    validate_image_signatures(&map_claude_model_to_gemini(&model_name), &body)?;

    let access_token = state.credentials.access_token().await?;
    let project_id = state.credentials.project_id().await?;

    let wrapped = wrap_request(&body, &project_id, &model_name);

    if state.config.debug_traffic {
        debug!("[Gemini] Wrapped body: {}", wrapped.body);
    }

    let options = if is_stream { CallOptions::sse() } else { CallOptions::default() };
    let resp = state.upstream.call_v1_internal(&method, &access_token, &wrapped.body, &options).await?;

    if !resp.status().is_success() {
        return Ok(forward_error_response(resp).await);
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains("application/json") {
        let payload: Value = resp.json().await?;
        return Ok(Json(unwrap_response(&payload)).into_response());
    }

    if content_type.contains("stream") {
        let status = resp.status();
        let headers = sanitize_upstream_headers(resp.headers());
        let debug_traffic = state.config.debug_traffic;
        let stream = create_unwrap_stream(
            resp.bytes_stream(),
            move |chunk: &Value| {
                if debug_traffic {
                    debug!("[Gemini-SSE] Chunk: {}", chunk);
                }
            },
            state.stream_read_timeout(),
        );
        return Ok((status, headers, Body::from_stream(stream)).into_response());
    }

    Ok(passthrough_response(resp).await)
}
