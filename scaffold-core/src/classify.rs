//! Error classification.
//!
//! Every failure a stage can produce ends up here: errors returned through
//! `Err`, panic payloads, and JSON values returned as sentinels. Each is
//! sorted into [`Classified::Structured`] or [`Classified::Unclassified`].

use crate::{
    error::{BoxError, StageError},
    stage::Stage,
    structured::{ORIGINAL_ERROR_FIELD, StructuredError},
};
use serde_json::Value;
use std::any::Any;

/// A failure after classification.
#[derive(Debug)]
pub enum Classified {
    /// The failure is a structured error and is passed through unmodified.
    Structured(StructuredError),
    /// Anything else; surfaced as a `ServerError`.
    Unclassified(BoxError),
}

impl Classified {
    /// Resolve into the error that leaves the pipeline.
    ///
    /// Unclassified failures become a `ServerError`. With `pass_pure_errors`
    /// the original failure is kept in the `error` field.
    pub fn into_structured(self, pass_pure_errors: bool) -> StructuredError {
        match self {
            Classified::Structured(err) => err,
            Classified::Unclassified(original) => {
                let wrapped = StructuredError::server_error();
                if pass_pure_errors {
                    wrapped.with_field(ORIGINAL_ERROR_FIELD, original.to_string())
                } else {
                    wrapped
                }
            }
        }
    }

    /// Returns `true` for structured failures.
    pub fn is_structured(&self) -> bool {
        matches!(self, Classified::Structured(_))
    }
}

/// Returns `true` if `value` has the structured error shape.
///
/// The value must be an object with a string `status` and an integer `code`
/// that fits an HTTP-style status (`u16`).
pub fn is_structured_error(value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };
    let code_ok = fields
        .get("code")
        .and_then(Value::as_u64)
        .is_some_and(|code| u16::try_from(code).is_ok());
    let status_ok = fields.get("status").is_some_and(Value::is_string);
    code_ok && status_ok
}

/// Classify an error returned by a stage.
pub fn classify(err: BoxError) -> Classified {
    match err.downcast::<StructuredError>() {
        Ok(structured) => Classified::Structured(*structured),
        Err(other) => Classified::Unclassified(other),
    }
}

/// Classify the payload of a panic raised inside a stage.
///
/// `std::panic::panic_any(StructuredError)` is a structured failure; any other
/// payload is unclassified.
pub fn classify_panic(stage: Stage, payload: Box<dyn Any + Send>) -> Classified {
    match payload.downcast::<StructuredError>() {
        Ok(structured) => Classified::Structured(*structured),
        Err(payload) => {
            Classified::Unclassified(Box::new(StageError::from_panic(stage, payload.as_ref())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_predicate() {
        assert!(is_structured_error(&json!({ "code": 400, "status": "BadRequest" })));
        assert!(is_structured_error(&json!({ "code": 500, "status": "", "x": null })));

        assert!(!is_structured_error(&json!(null)));
        assert!(!is_structured_error(&json!("ServerError")));
        assert!(!is_structured_error(&json!({ "code": 400 })));
        assert!(!is_structured_error(&json!({ "status": "BadRequest" })));
        assert!(!is_structured_error(&json!({ "code": "400", "status": "BadRequest" })));
        assert!(!is_structured_error(&json!({ "code": 400, "status": 1 })));
        assert!(!is_structured_error(&json!({ "code": 70000, "status": "Huge" })));
        assert!(!is_structured_error(&json!({ "code": 4.5, "status": "Fraction" })));
    }

    #[test]
    fn classify_downcasts_structured_errors() {
        let err: BoxError = Box::new(StructuredError::new(401, "Unauthorized"));
        match classify(err) {
            Classified::Structured(e) => assert_eq!(e.code, 401),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn classify_keeps_foreign_errors() {
        let err: BoxError = "boom".into();
        let classified = classify(err);
        assert!(!classified.is_structured());
        assert_eq!(
            classified.into_structured(false).to_value(),
            json!({ "code": 500, "status": "ServerError" })
        );
    }

    #[test]
    fn pure_errors_expose_original() {
        let err: BoxError = "boom".into();
        let wrapped = classify(err).into_structured(true);
        assert_eq!(wrapped.code, 500);
        assert_eq!(wrapped.original(), Some(&json!("boom")));
    }

    #[test]
    fn panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(StructuredError::new(418, "Teapot"));
        assert!(classify_panic(Stage::Callback, payload).is_structured());

        let payload: Box<dyn Any + Send> = Box::new("boom");
        let wrapped = classify_panic(Stage::Callback, payload).into_structured(true);
        assert_eq!(wrapped.original(), Some(&json!("callback stage panicked: boom")));
    }
}
