//! # scaffold-core
//!
//! Core types and traits for the scaffold request pipeline.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transport adapters and stage libraries that don't need the pipeline
//! engine itself.
//!
//! # Building Blocks
//!
//! ## Stages ([`Construct`], [`Callback`], [`Destruct`])
//!
//! User-supplied functions, run strictly in order for every request:
//! extract a source value, run business logic on it, shape the result into a
//! response value. Closures and structs both work.
//!
//! ## Outcomes ([`IntoOutcome`], [`Outcome`])
//!
//! A stage signals failure by returning `Err`, by returning
//! [`Outcome::Failure`], or by returning a JSON value with the structured
//! error shape. All of them reach the classifier the same way.
//!
//! ## Classification ([`classify()`], [`is_structured_error`])
//!
//! Sorts failures into structured errors, which pass through unmodified, and
//! everything else, which becomes a generic `ServerError`.
//!
//! ## Transport Seam ([`ResponseChannel`], [`NextHandler`], [`Action`])
//!
//! The narrow interface a transport adapter provides. A request is settled
//! with exactly one [`Action`].
//!
//! # Error Types
//!
//! - [`StructuredError`] - Application-level failure with code and status
//! - [`StageError`] - Failures raised around a stage (panics, timeouts, serialization)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod classify;
mod error;
mod normalize;
mod outcome;
mod stage;
mod structured;
mod transport;

// Re-exports
pub use classify::{Classified, classify, classify_panic, is_structured_error};
pub use error::{BoxError, StageError};
pub use normalize::{SUCCESS_CODE, SUCCESS_STATUS, normalize_success, response_code};
pub use outcome::{IntoOutcome, Outcome};
pub use stage::{
    Callback, Construct, Destruct, PassThrough, ResponseOf, SourceOf, Stage, TargetOf,
};
pub use structured::{
    ORIGINAL_ERROR_FIELD, SERVER_ERROR_CODE, SERVER_ERROR_STATUS, StructuredError,
};
pub use transport::{Action, Disposition, NextHandler, ResponseChannel};
