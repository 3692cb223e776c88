//! Tool building for Gemini API.

use super::super::models::Tool;
use serde_json::{json, Value};

/// Declarations for every named client tool; `None` when there are none.
pub fn build_tools(tools: &Option<Vec<Tool>>) -> Option<Value> {
    let declarations: Vec<Value> = tools
        .as_ref()?
        .iter()
        .filter_map(|tool| {
            let name = tool.name.as_ref()?;
            let mut parameters = tool
                .input_schema
                .clone()
                .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
            strip_schema_keywords(&mut parameters);

            let mut decl = json!({
                "name": name,
                "parameters": parameters
            });
            if let Some(description) = &tool.description {
                decl["description"] = json!(description);
            }
            Some(decl)
        })
        .collect();

    if declarations.is_empty() {
        return None;
    }
    Some(json!([{ "functionDeclarations": declarations }]))
}

/// Remove JSON-Schema keywords the v1internal schema parser rejects.
fn strip_schema_keywords(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("additionalProperties");
            for value in map.values_mut() {
                strip_schema_keywords(value);
            }
        },
        Value::Array(items) => items.iter_mut().for_each(strip_schema_keywords),
        _ => {},
    }
}
