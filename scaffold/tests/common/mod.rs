#![allow(dead_code)]

use scaffold::{BoxError, StructuredError};
use serde_json::{Value, json};
use std::future::{Ready, ready};

// ============================================================================
// Test Request Types
// ============================================================================

#[derive(Clone, Debug)]
pub struct Signup {
    pub password: String,
}

impl Signup {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
        }
    }
}

// ============================================================================
// Test Stages
// ============================================================================

/// Extracts the password; an empty one is rejected with 422.
pub fn extract_password(req: &Signup) -> Ready<Result<String, StructuredError>> {
    ready(if req.password.is_empty() {
        Err(StructuredError::new(422, "Unprocessable"))
    } else {
        Ok(req.password.clone())
    })
}

/// Hashes the password.
///
/// `"boom"` fails with a plain error, anything shorter than three characters
/// fails with `400 BadRequest`.
pub async fn hash_password(password: String) -> Result<Value, BoxError> {
    if password == "boom" {
        return Err("boom".into());
    }
    if password.len() < 3 {
        return Err(Box::new(StructuredError::new(400, "BadRequest")));
    }
    Ok(json!({ "hash": "h", "salt": "s" }))
}

pub fn bad_request() -> StructuredError {
    StructuredError::new(400, "BadRequest")
}
