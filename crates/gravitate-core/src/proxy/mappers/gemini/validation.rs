//! Pre-flight checks for image-generation models.

use serde_json::Value;

use gravitate_types::ProxyError;

const IMAGE_MODEL_PREFIX: &str = "gemini-3-pro-image";

pub fn is_image_model(model: &str) -> bool {
    model.trim().to_ascii_lowercase().starts_with(IMAGE_MODEL_PREFIX)
}

/// `null`, `false`, `0` and `""` count as absent.
fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_present<'a>(part: &'a Value, keys: [&str; 2]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| part.get(*key)).find(|v| present(v))
}

/// Non-string mime types read as empty, which counts as an image.
fn is_image_data(inline: &Value) -> bool {
    let mime = ["mimeType", "mime_type"]
        .iter()
        .find_map(|key| inline.get(*key).and_then(Value::as_str))
        .unwrap_or_default();
    mime.is_empty() || mime.to_ascii_lowercase().starts_with("image/")
}

/// The first non-null signature field decides; a non-string or blank one is missing.
fn has_signature(part: &Value) -> bool {
    ["thoughtSignature", "thought_signature"]
        .iter()
        .filter_map(|key| part.get(*key))
        .find(|v| !v.is_null())
        .and_then(Value::as_str)
        .is_some_and(|sig| !sig.trim().is_empty())
}

/// Reject history whose model-authored images lack a thought signature.
///
/// Accepts either an enveloped body (`request.contents`) or a bare one.
/// Fields are read one by one so a malformed part cannot slip past the check.
pub fn validate_image_signatures(model: &str, body: &Value) -> Result<(), ProxyError> {
    if !is_image_model(model) {
        return Ok(());
    }

    let Some(contents) = body
        .get("request")
        .and_then(|r| r.get("contents"))
        .or_else(|| body.get("contents"))
        .and_then(Value::as_array)
    else {
        return Ok(());
    };

    for (content_index, content) in contents.iter().enumerate() {
        let role = content.get("role").and_then(Value::as_str).unwrap_or_default().to_ascii_lowercase();
        if role != "model" && role != "assistant" {
            continue;
        }
        let Some(parts) = content.get("parts").and_then(Value::as_array) else {
            continue;
        };
        for (part_index, part) in parts.iter().enumerate() {
            let Some(inline) = first_present(part, ["inlineData", "inline_data"]) else {
                continue;
            };
            if is_image_data(inline) && !has_signature(part) {
                tracing::warn!(
                    "[Image-Validator] Unsigned image at content {} part {} for model {}",
                    content_index,
                    part_index,
                    model
                );
                return Err(ProxyError::ImageSignatureMissing { content_index, part_index });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history(image_part: Value) -> Value {
        json!({
            "contents": [
                {"role": "user", "parts": [{"text": "draw a cat"}]},
                {"role": "model", "parts": [{"text": "here"}, image_part]},
                {"role": "user", "parts": [{"text": "make it blue"}]}
            ]
        })
    }

    #[test]
    fn test_unsigned_model_image_rejected() {
        let body = history(json!({"inlineData": {"mimeType": "image/png", "data": "AAA"}}));
        let err = validate_image_signatures("gemini-3-pro-image-preview", &body).unwrap_err();
        assert_eq!(err, ProxyError::ImageSignatureMissing { content_index: 1, part_index: 1 });
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_snake_case_signed_image_accepted() {
        let body = history(json!({
            "inline_data": {"mime_type": "image/png", "data": "AAA"},
            "thought_signature": "sig"
        }));
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_ok());
    }

    #[test]
    fn test_blank_signature_counts_as_missing() {
        let body = history(json!({
            "inlineData": {"data": "AAA"},
            "thoughtSignature": "   "
        }));
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_err());
    }

    #[test]
    fn test_enveloped_body_and_user_images() {
        let body = json!({
            "request": {"contents": [
                {"role": "user", "parts": [{"inlineData": {"mimeType": "image/png", "data": "AAA"}}]}
            ]}
        });
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_ok());
    }

    #[test]
    fn test_other_models_skip_validation() {
        let body = history(json!({"inlineData": {"mimeType": "image/png", "data": "AAA"}}));
        assert!(validate_image_signatures("gemini-3-flash", &body).is_ok());
    }

    #[test]
    fn test_non_image_inline_data_ignored() {
        let body = history(json!({"inlineData": {"mimeType": "application/pdf", "data": "AAA"}}));
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_ok());
    }

    #[test]
    fn test_null_mime_type_counts_as_image() {
        let body = history(json!({"inlineData": {"mimeType": null, "data": "AAA"}}));
        assert_eq!(
            validate_image_signatures("gemini-3-pro-image", &body),
            Err(ProxyError::ImageSignatureMissing { content_index: 1, part_index: 1 })
        );
    }

    #[test]
    fn test_non_string_signature_counts_as_missing() {
        let body = history(json!({
            "inlineData": {"mimeType": "image/png", "data": "AAA"},
            "thoughtSignature": 7
        }));
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_err());

        let body = history(json!({
            "inline_data": {"mime_type": 42, "data": "AAA"},
            "thoughtSignature": null,
            "thought_signature": "sig"
        }));
        assert!(validate_image_signatures("gemini-3-pro-image", &body).is_ok());
    }
}
