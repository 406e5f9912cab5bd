//! Conversion between plain JSON and Firestore REST typed values.
//!
//! Firestore's REST surface wraps every field in a one-key type object
//! (`{"stringValue": "x"}`). Pages work with plain JSON, so documents are
//! translated at the HTTP boundary in both directions.
//!
//! Integers travel as decimal strings (`integerValue`); timestamps are kept as
//! their RFC 3339 text and geo points decode to `{latitude, longitude}` maps.

#[cfg(test)]
#[path = "firestore_value_test.rs"]
mod firestore_value_test;

use serde_json::{Map, Value, json};

/// Encode one plain JSON value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a plain JSON object into a Firestore `fields` object.
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect())
}

/// Decode one typed value. Unknown shapes decode to `null`.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map_or(Value::Null, Value::from),
            other => other.clone(),
        },
        "doubleValue" => match inner {
            Value::String(s) => s.parse::<f64>().map_or(Value::Null, Value::from),
            other => other.clone(),
        },
        "geoPointValue" => json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        }),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => decode_fields(inner.get("fields").unwrap_or(&Value::Null)),
        _ => Value::Null,
    }
}

/// Decode a Firestore `fields` object into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Value {
    let map = fields
        .as_object()
        .map(|o| o.iter().map(|(k, v)| (k.clone(), decode_value(v))).collect())
        .unwrap_or_default();
    Value::Object(map)
}
