//! Mapping between plain JSON and the document store's typed values.
//!
//! The store wraps every field in a type tag (`{"stringValue": "dark"}`);
//! callers work with plain JSON. `integerValue` is a decimal string on the
//! wire; `timestampValue` is kept as its RFC 3339 string.

use serde_json::{json, Map, Value};

#[must_use]
pub fn to_firestore(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({"doubleValue": n}),
            |i| json!({"integerValue": i.to_string()}),
        ),
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => json!({
            "arrayValue": {"values": items.iter().map(to_firestore).collect::<Vec<_>>()}
        }),
        Value::Object(map) => json!({"mapValue": {"fields": fields_to_firestore(map)}}),
    }
}

#[must_use]
pub fn fields_to_firestore(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), to_firestore(v)))
            .collect(),
    )
}

#[must_use]
pub fn from_firestore(value: &Value) -> Value {
    if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = value.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(b) = value.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(i) = value.get("integerValue") {
        // decimal string on the wire, bare number tolerated
        if let Some(i) = i.as_str().and_then(|s| s.parse::<i64>().ok()) {
            return json!(i);
        }
        if let Some(i) = i.as_i64() {
            return json!(i);
        }
    }
    if let Some(f) = value.get("doubleValue").and_then(Value::as_f64) {
        return json!(f);
    }
    if value.get("nullValue").is_some() {
        return Value::Null;
    }
    if let Some(array) = value.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        return Value::Array(values.iter().map(from_firestore).collect());
    }
    if let Some(map) = value.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        return Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), from_firestore(v)))
                .collect(),
        );
    }
    Value::Null
}

#[must_use]
pub fn fields_from_firestore(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), from_firestore(v)))
        .collect()
}
