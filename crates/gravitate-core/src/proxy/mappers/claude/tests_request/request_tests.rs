use std::time::Duration;

use serde_json::{json, Value};

use crate::proxy::mappers::claude::models::*;
use crate::proxy::mappers::claude::request::*;
use crate::proxy::signature_cache::SignatureCache;

fn request(value: Value) -> ClaudeRequest {
    serde_json::from_value(value).unwrap()
}

fn cache() -> SignatureCache {
    SignatureCache::new(64, Duration::from_secs(3600))
}

fn function_call_part<'a>(body: &'a Value, id: &str) -> &'a Value {
    body["request"]["contents"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["parts"].as_array().unwrap().iter())
        .find(|p| p["functionCall"]["id"] == id)
        .unwrap_or_else(|| panic!("functionCall {id} not found"))
}

fn two_turn_conversation() -> ClaudeRequest {
    request(json!({
        "model": "claude-sonnet-4-5",
        "messages": [
            {"role": "user", "content": "list the files"},
            {"role": "assistant", "content": [
                {"type": "tool_use", "id": "toolu_prev", "name": "Bash", "input": {"command": "ls"}}
            ]},
            {"role": "user", "content": [
                {"type": "tool_result", "tool_use_id": "toolu_prev", "content": "a.rs"}
            ]},
            {"role": "assistant", "content": [{"type": "text", "text": "There is a.rs"}]},
            {"role": "user", "content": [{"type": "text", "text": "now read it"}]},
            {"role": "assistant", "content": [
                {"type": "tool_use", "id": "toolu_cur", "name": "Read", "input": {"path": "a.rs"}}
            ]},
            {"role": "user", "content": [
                {"type": "tool_result", "tool_use_id": "toolu_cur", "content": "fn main() {}"}
            ]}
        ]
    }))
}

#[test]
fn test_simple_request_envelope() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "messages": [{"role": "user", "content": "Hello"}]
    }));

    let out = transform_claude_request_in(&req, "proj-1", &cache(), RequestOptions::default())
        .unwrap();

    assert_eq!(out.mapped_model, "claude-sonnet-4-5");
    assert_eq!(out.body["project"], "proj-1");
    assert_eq!(out.body["model"], "claude-sonnet-4-5");
    assert!(out.body["requestId"].as_str().unwrap().starts_with("agent-"));
    assert_eq!(out.body["request"]["contents"][0]["role"], "user");
    assert_eq!(out.body["request"]["contents"][0]["parts"][0]["text"], "Hello");
    assert_eq!(out.body["request"]["generationConfig"]["maxOutputTokens"], 65535);
    assert_eq!(out.body["userAgent"], "antigravity");
    assert_eq!(out.body["requestType"], "agent");
}

#[test]
fn test_haiku_alias_is_remapped() {
    let req = request(json!({
        "model": "claude-haiku-4-5",
        "messages": [{"role": "user", "content": "hi"}]
    }));
    let out = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default()).unwrap();
    assert_eq!(out.mapped_model, "gemini-3-flash");
    assert_eq!(out.body["model"], "gemini-3-flash");
}

#[test]
fn test_client_max_tokens_is_kept() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "max_tokens": 1024,
        "temperature": 0.5,
        "messages": [{"role": "user", "content": "hi"}]
    }));
    let out = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default()).unwrap();
    let config = &out.body["request"]["generationConfig"];
    assert_eq!(config["maxOutputTokens"], 1024);
    assert_eq!(config["temperature"], 0.5);
}

#[test]
fn test_empty_messages_rejected() {
    let req = request(json!({"model": "claude-sonnet-4-5", "messages": []}));
    let err = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default())
        .unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn test_cached_signature_only_in_current_turn() {
    let signatures = cache();
    signatures.put("toolu_prev", "sig-prev".to_string());
    signatures.put("toolu_cur", "sig-cur".to_string());

    let out = transform_claude_request_in(
        &two_turn_conversation(),
        "p",
        &signatures,
        RequestOptions::default(),
    )
    .unwrap();

    assert_eq!(function_call_part(&out.body, "toolu_cur")["thoughtSignature"], "sig-cur");
    assert!(function_call_part(&out.body, "toolu_prev").get("thoughtSignature").is_none());
}

#[test]
fn test_prior_turn_never_gets_placeholder() {
    let options = RequestOptions { turn_start_override: None, dummy_signature_fallback: true };
    let out =
        transform_claude_request_in(&two_turn_conversation(), "p", &cache(), options).unwrap();

    assert_eq!(function_call_part(&out.body, "toolu_cur")["thoughtSignature"], DUMMY_SIGNATURE);
    assert!(function_call_part(&out.body, "toolu_prev").get("thoughtSignature").is_none());
}

#[test]
fn test_placeholder_only_on_first_parallel_call() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "messages": [
            {"role": "user", "content": "check both"},
            {"role": "assistant", "content": [
                {"type": "tool_use", "id": "toolu_a", "name": "Read", "input": {"path": "a"}},
                {"type": "tool_use", "id": "toolu_b", "name": "Read", "input": {"path": "b"}}
            ]}
        ]
    }));
    let options = RequestOptions { turn_start_override: None, dummy_signature_fallback: true };
    let out = transform_claude_request_in(&req, "p", &cache(), options).unwrap();

    assert_eq!(function_call_part(&out.body, "toolu_a")["thoughtSignature"], DUMMY_SIGNATURE);
    assert!(function_call_part(&out.body, "toolu_b").get("thoughtSignature").is_none());
}

#[test]
fn test_no_placeholder_when_fallback_disabled() {
    let out = transform_claude_request_in(
        &two_turn_conversation(),
        "p",
        &cache(),
        RequestOptions::default(),
    )
    .unwrap();
    assert!(function_call_part(&out.body, "toolu_cur").get("thoughtSignature").is_none());
}

#[test]
fn test_turn_start_override_past_end_attaches_nothing() {
    let req = two_turn_conversation();
    let signatures = cache();
    signatures.put("toolu_cur", "sig-cur".to_string());
    let options = RequestOptions {
        turn_start_override: Some(req.messages.len()),
        dummy_signature_fallback: true,
    };

    let out = transform_claude_request_in(&req, "p", &signatures, options).unwrap();

    assert!(function_call_part(&out.body, "toolu_cur").get("thoughtSignature").is_none());
    assert!(function_call_part(&out.body, "toolu_prev").get("thoughtSignature").is_none());
}

#[test]
fn test_tool_result_uses_tool_name() {
    let out = transform_claude_request_in(
        &two_turn_conversation(),
        "p",
        &cache(),
        RequestOptions::default(),
    )
    .unwrap();

    let contents = out.body["request"]["contents"].as_array().unwrap();
    let response = contents
        .iter()
        .flat_map(|c| c["parts"].as_array().unwrap().iter())
        .find(|p| p["functionResponse"]["id"] == "toolu_cur")
        .unwrap();
    assert_eq!(response["functionResponse"]["name"], "Read");
    assert_eq!(response["functionResponse"]["response"]["result"], "fn main() {}");
}

#[test]
fn test_thinking_kept_only_when_signed_in_current_turn() {
    let req = request(json!({
        "model": "claude-opus-4-5-thinking",
        "thinking": {"type": "enabled", "budget_tokens": 8000},
        "messages": [
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": [
                {"type": "thinking", "thinking": "old thought", "signature": "sig-old"},
                {"type": "text", "text": "old answer"}
            ]},
            {"role": "user", "content": "second"},
            {"role": "assistant", "content": [
                {"type": "thinking", "thinking": "new thought", "signature": "sig-new"},
                {"type": "thinking", "thinking": "unsigned thought"},
                {"type": "text", "text": "partial"}
            ]}
        ]
    }));

    let out = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default()).unwrap();
    let contents = out.body["request"]["contents"].as_array().unwrap();
    let thoughts: Vec<&Value> = contents
        .iter()
        .flat_map(|c| c["parts"].as_array().unwrap().iter())
        .filter(|p| p["thought"] == true)
        .collect();

    assert_eq!(thoughts.len(), 1);
    assert_eq!(thoughts[0]["text"], "new thought");
    assert_eq!(thoughts[0]["thoughtSignature"], "sig-new");

    let config = &out.body["request"]["generationConfig"];
    assert_eq!(config["thinkingConfig"]["includeThoughts"], true);
    assert_eq!(config["thinkingConfig"]["thinkingBudget"], 8000);
}

#[test]
fn test_tools_enable_validated_mode() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "tools": [{
            "name": "Bash",
            "description": "Run a command",
            "input_schema": {"type": "object", "properties": {"command": {"type": "string"}}}
        }],
        "messages": [{"role": "user", "content": "run ls"}]
    }));

    let out = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default()).unwrap();
    let inner = &out.body["request"];
    assert_eq!(inner["tools"][0]["functionDeclarations"][0]["name"], "Bash");
    assert_eq!(inner["toolConfig"]["functionCallingConfig"]["mode"], "VALIDATED");
}

#[test]
fn test_system_prompt_precedes_injected_identity_for_claude_models() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "system": [{"type": "text", "text": "Be brief."}],
        "messages": [{"role": "user", "content": "hi"}]
    }));

    let out = transform_claude_request_in(&req, "p", &cache(), RequestOptions::default()).unwrap();
    let parts = out.body["request"]["systemInstruction"]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert!(parts[0]["text"].as_str().unwrap().starts_with("You are Antigravity"));
    assert!(parts[1]["text"].as_str().unwrap().starts_with("Please ignore following [ignore]"));
    assert_eq!(parts[2]["text"], "Be brief.");
}

#[test]
fn test_placeholder_goes_to_first_unsigned_call() {
    let req = request(json!({
        "model": "claude-sonnet-4-5",
        "messages": [
            {"role": "user", "content": "three reads"},
            {"role": "assistant", "content": [
                {"type": "tool_use", "id": "toolu_a", "name": "Read", "input": {}},
                {"type": "tool_use", "id": "toolu_b", "name": "Read", "input": {}},
                {"type": "tool_use", "id": "toolu_c", "name": "Read", "input": {}}
            ]}
        ]
    }));
    let signatures = cache();
    signatures.put("toolu_a", "sig-a".to_string());
    let options = RequestOptions { turn_start_override: None, dummy_signature_fallback: true };

    let out = transform_claude_request_in(&req, "p", &signatures, options).unwrap();

    assert_eq!(function_call_part(&out.body, "toolu_a")["thoughtSignature"], "sig-a");
    assert_eq!(function_call_part(&out.body, "toolu_b")["thoughtSignature"], DUMMY_SIGNATURE);
    assert!(function_call_part(&out.body, "toolu_c").get("thoughtSignature").is_none());
}

#[test]
fn test_prepared_request_has_no_envelope_until_wrapped() {
    let req = request(json!({
        "model": "claude-haiku-4-5",
        "messages": [{"role": "user", "content": "Hello"}]
    }));

    let prepared = prepare_claude_request(&req, &cache(), RequestOptions::default()).unwrap();
    assert_eq!(prepared.mapped_model, "gemini-3-flash");
    assert_eq!(prepared.inner["contents"][0]["parts"][0]["text"], "Hello");
    assert!(prepared.inner.get("project").is_none());
    assert!(prepared.inner.get("request").is_none());

    let wrapped = prepared.into_envelope("proj-9");
    assert_eq!(wrapped.body["project"], "proj-9");
    assert_eq!(wrapped.body["model"], "gemini-3-flash");
    assert_eq!(wrapped.body["userAgent"], "antigravity");
    assert_eq!(wrapped.body["request"]["contents"][0]["parts"][0]["text"], "Hello");
}
