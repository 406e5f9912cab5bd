use super::*;

// =============================================================
// encode
// =============================================================

#[test]
fn encode_scalars() {
    assert_eq!(encode_value(&json!("a")), json!({ "stringValue": "a" }));
    assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
    assert_eq!(encode_value(&json!(42)), json!({ "integerValue": "42" }));
    assert_eq!(encode_value(&json!(4.5)), json!({ "doubleValue": 4.5 }));
    assert_eq!(encode_value(&Value::Null), json!({ "nullValue": null }));
}

#[test]
fn encode_nested_map_and_array() {
    let encoded = encode_value(&json!({ "loc": { "latitude": 1.5 }, "tags": ["x"] }));
    assert_eq!(
        encoded,
        json!({ "mapValue": { "fields": {
            "loc": { "mapValue": { "fields": { "latitude": { "doubleValue": 1.5 } } } },
            "tags": { "arrayValue": { "values": [{ "stringValue": "x" }] } }
        } } })
    );
}

// =============================================================
// decode
// =============================================================

#[test]
fn decode_document_fields() {
    let fields = json!({
        "name": { "stringValue": "Fresh Fold" },
        "rating": { "doubleValue": 4.5 },
        "count": { "integerValue": "7" },
        "open": { "booleanValue": true },
        "createdAt": { "timestampValue": "2024-05-01T10:30:00Z" },
        "location": { "geoPointValue": { "latitude": 28.5, "longitude": 77.1 } },
        "items": { "arrayValue": { "values": [
            { "mapValue": { "fields": { "name": { "stringValue": "Shirt" } } } }
        ] } },
        "note": { "nullValue": null }
    });
    assert_eq!(
        decode_fields(&fields),
        json!({
            "name": "Fresh Fold",
            "rating": 4.5,
            "count": 7,
            "open": true,
            "createdAt": "2024-05-01T10:30:00Z",
            "location": { "latitude": 28.5, "longitude": 77.1 },
            "items": [{ "name": "Shirt" }],
            "note": null
        })
    );
}

#[test]
fn decode_empty_array_and_unknown_kind() {
    assert_eq!(decode_value(&json!({ "arrayValue": {} })), json!([]));
    assert_eq!(decode_value(&json!({ "futureValue": 1 })), Value::Null);
    assert_eq!(decode_fields(&Value::Null), json!({}));
}

#[test]
fn encode_then_decode_preserves_plain_document() {
    let doc = json!({ "name": "Asha", "total": 120, "rated": false, "items": [{ "price": 20.5 }] });
    let map = doc.as_object().unwrap();
    assert_eq!(decode_fields(&encode_fields(map)), doc);
}
