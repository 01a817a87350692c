//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore REST payloads wrap every value in a single-key object naming its
//! type, e.g. `{"stringValue": "hi"}` or `{"integerValue": "42"}` (64-bit
//! integers travel as strings).

use crate::backend::documents::Fields;
use crate::backend::error::BackendError;
use serde_json::{Map, Value, json};

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect();
    Value::Object(encoded)
}

pub fn decode_value(value: &Value) -> Result<Value, BackendError> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(BackendError::Decode(format!("firestore value {}", value)));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| BackendError::Decode(format!("integerValue {}", inner)))
        }
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let items = match inner.get("values") {
                Some(Value::Array(items)) => items,
                // Empty arrays omit `values`
                _ => return Ok(Value::Array(Vec::new())),
            };
            items
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => decode_fields(fields).map(Value::Object),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(BackendError::Decode(format!(
            "unsupported firestore value type {}",
            other
        ))),
    }
}

pub fn decode_fields(fields: &Value) -> Result<Fields, BackendError> {
    let Some(map) = fields.as_object() else {
        return Err(BackendError::Decode(format!("firestore fields {}", fields)));
    };
    map.iter()
        .map(|(name, value)| decode_value(value).map(|decoded| (name.clone(), decoded)))
        .collect()
}
