//! Error types for scaffold.
//!
//! Failures inside a pipeline never escape it; they are classified and turned
//! into a terminal [`Action`](crate::Action). The types here describe the
//! failures the pipeline itself can produce:
//!
//! - [`BoxError`] - Type-erased failure at every stage seam
//! - [`StageError`] - Failures raised by the pipeline machinery around a stage

use crate::stage::Stage;
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised around a stage rather than by the stage's own logic.
///
/// These are never structured errors; the classifier always treats them as
/// unclassified failures and wraps them into a `ServerError`.
#[derive(Error, Debug)]
pub enum StageError {
    /// The stage panicked with a non-structured payload.
    #[error("{stage} stage panicked: {message}")]
    Panicked {
        /// The stage that panicked.
        stage: Stage,
        /// The panic message, or a placeholder for opaque payloads.
        message: String,
    },

    /// The stage did not complete in time.
    #[error("stage timed out after {0:?}")]
    TimedOut(Duration),

    /// A stage value could not be serialized into a response body.
    #[error("failed to serialize {stage} value: {source}")]
    Serialize {
        /// The stage whose value failed to serialize.
        stage: Stage,
        /// The underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl StageError {
    /// Build a [`StageError::Panicked`] from a panic payload.
    ///
    /// String payloads (from `panic!("...")`) keep their message.
    pub fn from_panic(stage: Stage, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };
        StageError::Panicked { stage, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_is_kept() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let err = StageError::from_panic(Stage::Callback, payload.as_ref());
        assert_eq!(err.to_string(), "callback stage panicked: boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let err = StageError::from_panic(Stage::Construct, payload.as_ref());
        assert_eq!(err.to_string(), "construct stage panicked: owned");
    }

    #[test]
    fn opaque_panic_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        let err = StageError::from_panic(Stage::Destruct, payload.as_ref());
        assert!(matches!(err, StageError::Panicked { stage: Stage::Destruct, .. }));
    }
}
