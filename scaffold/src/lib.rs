//! # scaffold - Three-Stage Request Pipelines
//!
//! `scaffold` turns the extract → process → respond pattern of a request
//! handler into a single reusable pipeline with uniform error handling.
//!
//! Every request runs three stages in order:
//!
//! 1. **construct** extracts a source value from the request,
//! 2. **callback** runs the business logic on it,
//! 3. **destruct** shapes the result into a response value.
//!
//! Any stage may fail by returning `Err`, by returning
//! [`Outcome::Failure`], or by panicking. Failures are classified once:
//! [`StructuredError`]s keep their own code and status, anything else is
//! surfaced as a generic `500 ServerError`. Each request then settles with
//! exactly one terminal action, a response write or a delegation to the
//! next handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use scaffold::{Disposition, StructuredError, scaffold};
//! use scaffold::testing::{RecordingNext, RecordingResponse};
//! use serde_json::json;
//!
//! struct Signup {
//!     password: String,
//! }
//!
//! # futures::executor::block_on(async {
//! let handler = scaffold(
//!     |req: &Signup| {
//!         let password = req.password.clone();
//!         async move { Ok::<_, StructuredError>(password) }
//!     },
//!     |password: String| async move {
//!         if password.len() < 3 {
//!             return Err(StructuredError::new(400, "BadRequest"));
//!         }
//!         Ok(json!({ "hash": "h", "salt": "s" }))
//!     },
//! );
//!
//! let response = RecordingResponse::new();
//! let disposition = handler
//!     .handle(
//!         &Signup { password: "abc".into() },
//!         &mut response.clone(),
//!         RecordingNext::new(),
//!     )
//!     .await;
//!
//! assert_eq!(disposition, Disposition::Responded { code: 200 });
//! assert_eq!(
//!     response.last_body(),
//!     Some(json!({ "hash": "h", "salt": "s", "code": 200, "status": "Success" }))
//! );
//! # });
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing` (default): request spans and stage logs through `tracing`
//! - `macros`: `#[derive(Fault)]` for user error types
//! - `tower`: [`ScaffoldService`], a `tower::Service` adapter
//! - `timeout`: the `Timeout` stage wrapper from `scaffold-std`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod config;
mod executor;
mod pipeline;
#[cfg(feature = "tower")]
mod service;

pub use config::ScaffoldConfig;
pub use executor::{Executed, StageExecutor};
pub use pipeline::{Scaffold, scaffold};
#[cfg(feature = "tower")]
pub use service::{Reply, ScaffoldService};

pub use scaffold_core::{
    // Transport seam
    Action,
    // Errors
    BoxError,
    // Stages
    Callback,
    // Classification
    Classified,
    Construct,
    Destruct,
    Disposition,
    // Outcomes
    IntoOutcome,
    NextHandler,
    // Constants
    ORIGINAL_ERROR_FIELD,
    Outcome,
    PassThrough,
    ResponseChannel,
    ResponseOf,
    SERVER_ERROR_CODE,
    SERVER_ERROR_STATUS,
    SUCCESS_CODE,
    SUCCESS_STATUS,
    SourceOf,
    Stage,
    StageError,
    StructuredError,
    TargetOf,
    classify,
    classify_panic,
    is_structured_error,
    // Normalization
    normalize_success,
    response_code,
};

pub use scaffold_std::BufferedResponse;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use scaffold_std::testing::*;
}

/// Time-limited stages.
#[cfg(feature = "timeout")]
pub mod timeout {
    #![allow(clippy::wildcard_imports)]
    pub use scaffold_std::timeout::*;
}

/// Prelude module - common imports for scaffold.
///
/// # Usage
///
/// ```rust,ignore
/// use scaffold::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Stages
        Callback,
        Construct,
        Destruct,
        // Transport seam
        Disposition,
        // Outcomes
        IntoOutcome,
        NextHandler,
        Outcome,
        ResponseChannel,
        // Pipeline
        Scaffold,
        ScaffoldConfig,
        // Errors
        StructuredError,
        scaffold,
    };
}

#[cfg(feature = "macros")]
pub use scaffold_macros::Fault;
