//! Stage output conversion.

use crate::{classify::is_structured_error, error::BoxError, structured::StructuredError};
use serde_json::Value;
use std::any::Any;

/// The result of a stage that signals failure by returning it.
///
/// Stages may also fail through `Err` or by panicking; all three paths are
/// classified identically.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The stage produced a value for the next stage.
    Success(T),
    /// The stage failed with a structured error.
    Failure(StructuredError),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` for [`Outcome::Failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Convert into a plain `Result`.
    pub fn into_result(self) -> Result<T, StructuredError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, StructuredError>> for Outcome<T> {
    fn from(result: Result<T, StructuredError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Failure(err),
        }
    }
}

/// Trait for converting a stage's output into a value or a failure.
///
/// # Default Implementations
///
/// - `Result<T, E>` → `Err` is classified; an `Ok` holding a `Value` with the
///   structured error shape is a failure too
/// - `Outcome<T>` → `Failure` is a structured failure
/// - `serde_json::Value` → a value with the structured error shape is a failure
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a stage output",
    label = "missing `IntoOutcome` implementation",
    note = "Return `Result<T, E>`, `Outcome<T>` or `serde_json::Value` from pipeline stages."
)]
pub trait IntoOutcome {
    /// The value handed to the next stage on success.
    type Value: Send + 'static;

    /// Split the output into a value or a failure to classify.
    fn into_outcome(self) -> Result<Self::Value, BoxError>;
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: Send + 'static,
    E: Into<BoxError>,
{
    type Value = T;

    fn into_outcome(self) -> Result<T, BoxError> {
        let value = self.map_err(Into::into)?;
        let failure = (&value as &dyn Any)
            .downcast_ref::<Value>()
            .filter(|json| is_structured_error(json))
            .and_then(|json| StructuredError::try_from(json.clone()).ok());
        match failure {
            Some(err) => Err(Box::new(err)),
            None => Ok(value),
        }
    }
}

impl<T: Send + 'static> IntoOutcome for Outcome<T> {
    type Value = T;

    fn into_outcome(self) -> Result<T, BoxError> {
        self.into_result().map_err(|err| Box::new(err) as BoxError)
    }
}

impl IntoOutcome for Value {
    type Value = Value;

    fn into_outcome(self) -> Result<Value, BoxError> {
        if !is_structured_error(&self) {
            return Ok(self);
        }
        match StructuredError::try_from(self) {
            Ok(err) => Err(Box::new(err)),
            Err(value) => Ok(value),
        }
    }
}
