use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use super::super::upstream_response::forward_error_response;
use super::super::ProxyState;
use crate::error::AppResult;
use crate::proxy::mappers::gemini::unwrap_response;
use gravitate_types::ProxyError;

const DEFAULT_GENERATION_METHODS: [&str; 2] = ["generateContent", "streamGenerateContent"];

fn first_str<'a>(info: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| info.get(*key).and_then(Value::as_str))
}

fn first_u64(info: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| info.get(*key).and_then(Value::as_u64))
}

fn describe_model(id: &str, info: &Value) -> Value {
    let mut model = Map::new();
    model.insert("name".to_string(), json!(format!("models/{}", id)));
    model.insert(
        "displayName".to_string(),
        json!(first_str(info, &["displayName"]).unwrap_or(id)),
    );
    model.insert(
        "description".to_string(),
        json!(first_str(info, &["description", "reason", "message"]).unwrap_or_default()),
    );
    let methods = info
        .get("supportedGenerationMethods")
        .filter(|m| m.as_array().is_some_and(|a| !a.is_empty()))
        .cloned()
        .unwrap_or_else(|| json!(DEFAULT_GENERATION_METHODS));
    model.insert("supportedGenerationMethods".to_string(), methods);

    if let Some(limit) =
        first_u64(info, &["inputTokenLimit", "maxInputTokens", "contextWindow", "context_window"])
    {
        model.insert("inputTokenLimit".to_string(), json!(limit));
    }
    if let Some(limit) = first_u64(info, &["outputTokenLimit", "maxOutputTokens"]) {
        model.insert("outputTokenLimit".to_string(), json!(limit));
    }
    Value::Object(model)
}

/// Gemini-style model entries from a `fetchAvailableModels` payload.
///
/// `models` may be a map of id → info or an array of entries naming their
/// id. Only gemini ids are listed.
pub fn build_model_list(data: &Value) -> Vec<Value> {
    let mut entries: Vec<(String, Value)> = match data.get("models") {
        Some(Value::Object(map)) => map.iter().map(|(id, info)| (id.clone(), info.clone())).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|info| {
                let id = first_str(info, &["id", "name", "model"])?;
                Some((id.trim_start_matches("models/").to_string(), info.clone()))
            })
            .collect(),
        _ => Vec::new(),
    };

    entries.retain(|(id, _)| id.to_ascii_lowercase().contains("gemini"));
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.dedup_by(|a, b| a.0 == b.0);
    entries.iter().map(|(id, info)| describe_model(id, info)).collect()
}

async fn fetch_model_list(state: &ProxyState) -> AppResult<Vec<Value>> {
    let access_token = state.credentials.access_token().await?;
    let data = state.upstream.fetch_available_models(&access_token).await?;
    Ok(build_model_list(&data))
}

/// `GET /v1beta/models`
pub async fn handle_list_models(State(state): State<ProxyState>) -> AppResult<Response> {
    let models = fetch_model_list(&state).await?;
    Ok(Json(json!({ "models": models })).into_response())
}

/// `GET /v1beta/models/{model}`
pub async fn handle_get_model(
    State(state): State<ProxyState>,
    Path(model_name): Path<String>,
) -> AppResult<Response> {
    let wanted = format!("models/{}", model_name.trim_start_matches("models/"));
    let models = fetch_model_list(&state).await?;

    models
        .into_iter()
        .find(|m| m.get("name").and_then(Value::as_str) == Some(wanted.as_str()))
        .map(|m| Json(m).into_response())
        .ok_or_else(|| ProxyError::ModelNotFound { model: model_name }.into())
}

/// `POST /v1beta/models/{model}:countTokens`
pub async fn handle_count_tokens(
    State(state): State<ProxyState>,
    Path(model_name): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let model = model_name.split_once(':').map_or(model_name.as_str(), |(m, _)| m);
    let contents = body
        .get("contents")
        .or_else(|| body.get("request").and_then(|r| r.get("contents")))
        .cloned()
        .unwrap_or_else(|| json!([]));

    let access_token = state.credentials.access_token().await?;
    let resp = state.upstream.count_tokens(&access_token, model, &contents).await?;
    if !resp.status().is_success() {
        return Ok(forward_error_response(resp).await);
    }

    let payload: Value = resp.json().await?;
    Ok(Json(unwrap_response(&payload)).into_response())
}
