//! Strict JSON schemas for structured model output.
//!
//! Schemas are derived with `schemars`, stripped of the `$schema` meta key
//! and closed with `additionalProperties: false` on every object so the
//! model cannot invent extra fields.

use schemars::JsonSchema;
use serde_json::Value;

/// Schema for a single object type `T`.
pub fn object_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    let mut value = serde_json::to_value(schema).expect("JsonSchema serialization should not fail");
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
    }
    close_objects(&mut value);
    value
}

/// Schema for a JSON array whose items are `T`.
///
/// The item schema is inlined rather than referenced through `$defs`.
pub fn array_schema<T: JsonSchema>() -> Value {
    let mut items = object_schema::<T>();
    if let Value::Object(map) = &mut items {
        map.remove("title");
    }
    serde_json::json!({
        "type": "array",
        "items": items,
    })
}

/// Recursively add `additionalProperties: false` to every object schema.
fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let is_object = map.get("type").and_then(Value::as_str) == Some("object");
            if is_object && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            for child in map.values_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}
