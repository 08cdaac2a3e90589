//! The structured error shape.
//!
//! A [`StructuredError`] is a self-describing application failure: an
//! HTTP-style `code`, a human `status` label and any number of auxiliary
//! fields. It serializes flat, so auxiliary fields appear beside `code` and
//! `status` in the response body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code used for unclassified failures.
pub const SERVER_ERROR_CODE: u16 = 500;

/// Status label used for unclassified failures.
pub const SERVER_ERROR_STATUS: &str = "ServerError";

/// Auxiliary field carrying the original failure of a `ServerError`.
pub const ORIGINAL_ERROR_FIELD: &str = "error";

/// An application-level failure with a numeric code and a status label.
///
/// # Example
///
/// ```rust
/// use scaffold_core::StructuredError;
///
/// let err = StructuredError::new(400, "BadRequest").with_field("field", "password");
/// assert_eq!(err.code, 400);
/// assert_eq!(
///     err.to_value(),
///     serde_json::json!({ "code": 400, "status": "BadRequest", "field": "password" })
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code} {status}")]
pub struct StructuredError {
    /// HTTP-style status code, also used as the transport status.
    pub code: u16,
    /// Human-readable status label.
    pub status: String,
    /// Auxiliary fields serialized beside `code` and `status`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredError {
    /// Create a structured error without auxiliary fields.
    pub fn new(code: u16, status: impl Into<String>) -> Self {
        Self {
            code,
            status: status.into(),
            extra: Map::new(),
        }
    }

    /// The generic `ServerError` used for unclassified failures.
    pub fn server_error() -> Self {
        Self::new(SERVER_ERROR_CODE, SERVER_ERROR_STATUS)
    }

    /// Attach an auxiliary field.
    ///
    /// `code` and `status` are reserved and cannot be overridden this way.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "code" && key != "status" {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Look up an auxiliary field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// The original failure carried by a `ServerError`, if it was exposed.
    pub fn original(&self) -> Option<&Value> {
        self.field(ORIGINAL_ERROR_FIELD)
    }

    /// Render this error as a response body.
    pub fn to_value(&self) -> Value {
        let mut body = Map::with_capacity(self.extra.len() + 2);
        body.insert("code".to_string(), Value::from(self.code));
        body.insert("status".to_string(), Value::from(self.status.clone()));
        for (key, value) in &self.extra {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

impl TryFrom<Value> for StructuredError {
    type Error = Value;

    /// Convert a JSON value that has the structured error shape.
    ///
    /// The value is handed back unchanged when it does not.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !crate::classify::is_structured_error(&value) {
            return Err(value);
        }
        let Value::Object(mut fields) = value else {
            return Err(value);
        };
        let code = fields
            .remove("code")
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(SERVER_ERROR_CODE);
        let status = match fields.remove("status") {
            Some(Value::String(s)) => s,
            _ => SERVER_ERROR_STATUS.to_string(),
        };
        Ok(Self {
            code,
            status,
            extra: fields,
        })
    }
}

impl From<StructuredError> for Value {
    fn from(err: StructuredError) -> Self {
        err.to_value()
    }
}
