//! Success body normalization.

use serde_json::{Map, Value};

/// Status label attached to successful responses.
pub const SUCCESS_STATUS: &str = "Success";

/// Default code attached to successful responses.
pub const SUCCESS_CODE: u16 = 200;

/// Ensure a successful response body carries `code` and `status`.
///
/// A missing `code`, or one that is not a valid `u16` status, becomes
/// `default_code`; a missing or
/// non-string `status` becomes `"Success"`. Fields already present with the
/// right type are left alone.
///
/// Non-object values are nested under `data` in a fresh object, and `null`
/// becomes an object holding only `code` and `status`.
///
/// # Example
///
/// ```rust
/// use scaffold_core::normalize_success;
/// use serde_json::json;
///
/// let body = normalize_success(json!({ "hash": "h" }), 200);
/// assert_eq!(body, json!({ "hash": "h", "code": 200, "status": "Success" }));
/// ```
pub fn normalize_success(value: Value, default_code: u16) -> Value {
    let mut fields = match value {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            let mut fields = Map::new();
            fields.insert("data".to_string(), other);
            fields
        }
    };

    if !fields.get("code").is_some_and(|code| as_status(code).is_some()) {
        fields.insert("code".to_string(), Value::from(default_code));
    }
    if !fields.get("status").is_some_and(Value::is_string) {
        fields.insert("status".to_string(), Value::from(SUCCESS_STATUS));
    }
    Value::Object(fields)
}

/// Read the transport status code from a normalized body.
///
/// Falls back to `default_code` when the body's own code is not a valid
/// `u16`, e.g. a user-supplied `code: 2.5`.
pub fn response_code(body: &Value, default_code: u16) -> u16 {
    body.get("code").and_then(as_status).unwrap_or(default_code)
}

fn as_status(code: &Value) -> Option<u16> {
    code.as_u64().and_then(|code| u16::try_from(code).ok())
}
