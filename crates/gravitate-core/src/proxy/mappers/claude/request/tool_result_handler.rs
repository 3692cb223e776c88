use serde_json::{json, Value};

pub fn build_tool_result_parts(
    tool_use_id: &str,
    content: &Value,
    is_error: Option<bool>,
    func_name: String,
) -> Vec<Value> {
    let (text_content, image_parts) = extract_content_and_images(content);
    let merged_content = ensure_non_empty(text_content, is_error);

    let part = json!({
        "functionResponse": {
            "name": func_name,
            "response": {"result": merged_content},
            "id": tool_use_id
        }
    });

    let mut result = vec![part];
    result.extend(image_parts);
    result
}

fn extract_content_and_images(content: &Value) -> (String, Vec<Value>) {
    let mut images = Vec::new();
    let text = match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => {
            let text_parts: Vec<String> = arr
                .iter()
                .filter_map(|block| match block.get("type").and_then(Value::as_str) {
                    Some("text") => block.get("text").and_then(Value::as_str).map(str::to_string),
                    Some("image") => {
                        let source = block.get("source")?;
                        let data = source.get("data").and_then(Value::as_str)?;
                        let media = source
                            .get("media_type")
                            .and_then(Value::as_str)
                            .unwrap_or("image/png");
                        images.push(json!({
                            "inlineData": {
                                "mimeType": media,
                                "data": data
                            }
                        }));
                        Some("[image attached below]".to_string())
                    },
                    _ => None,
                })
                .collect();

            if text_parts.is_empty() && !arr.is_empty() && images.is_empty() {
                content.to_string()
            } else {
                text_parts.join("\n")
            }
        },
        other => other.to_string(),
    };
    (text, images)
}

fn ensure_non_empty(content: String, is_error: Option<bool>) -> String {
    if !content.trim().is_empty() {
        return content;
    }
    if is_error.unwrap_or(false) {
        "Tool execution failed with no output.".to_string()
    } else {
        "Command executed successfully.".to_string()
    }
}
