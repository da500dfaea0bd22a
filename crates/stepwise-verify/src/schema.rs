//! Compilation of a tool's parameter declarations to JSON Schema.

use serde_json::{json, Map, Value};

use stepwise_contracts::tool::{ParamKind, ToolSpec};

/// JSON Schema type keyword for a parameter kind, or `None` for `Any`.
pub fn json_type(kind: ParamKind) -> Option<&'static str> {
    match kind {
        ParamKind::String => Some("string"),
        ParamKind::Integer => Some("integer"),
        ParamKind::Number => Some("number"),
        ParamKind::Boolean => Some("boolean"),
        ParamKind::Array => Some("array"),
        ParamKind::Object => Some("object"),
        ParamKind::Any => None,
    }
}

/// Object schema for `spec`'s argument mapping.
///
/// Every declared parameter becomes a property typed by its kind, required
/// parameters are listed in `required`, and undeclared keys are rejected.
pub fn schema_for(spec: &ToolSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &spec.parameters {
        let property = match json_type(param.kind) {
            Some(ty) => json!({ "type": ty }),
            None => json!({}),
        };
        properties.insert(param.name.clone(), property);
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
