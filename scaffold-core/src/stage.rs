//! # Pipeline Stages
//!
//! A pipeline runs three user-supplied stages in order:
//!
//! 1. [`Construct`] extracts a source value from the incoming request.
//! 2. [`Callback`] runs the business logic, turning the source into a target.
//! 3. [`Destruct`] shapes the target into the response value, with access to
//!    the request and the response channel.
//!
//! Every stage returns a future. Synchronous logic returns an
//! immediately-ready one (`std::future::ready` or an `async` block), so the
//! pipeline has a single suspension point per stage either way.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `|req: &Request| { let body = req.body.clone(); async move { ... } }`
//! 2. **Struct implementation**: `impl Callback<Credentials> for HashPassword`
//!
//! Closures receive borrowed arguments; copy what the future needs out of them
//! before the `async move` block. Struct implementations may borrow freely.

use crate::{
    error::{BoxError, StageError},
    outcome::IntoOutcome,
};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, future::Future};

/// One of the three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Argument extraction from the request.
    Construct,
    /// Business logic.
    Callback,
    /// Response shaping.
    Destruct,
}

impl Stage {
    /// The stage name as used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Construct => "construct",
            Stage::Callback => "callback",
            Stage::Destruct => "destruct",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a construct stage hands to the callback.
pub type SourceOf<C, Req> = <<C as Construct<Req>>::Output as IntoOutcome>::Value;

/// The value a callback hands to the destruct stage.
pub type TargetOf<K, In> = <<K as Callback<In>>::Output as IntoOutcome>::Value;

/// The value a destruct stage produces as the response.
pub type ResponseOf<D, In, Req, Res> = <<D as Destruct<In, Req, Res>>::Output as IntoOutcome>::Value;

/// Extracts the source value from an incoming request.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot construct a source value from `{Req}`",
    label = "missing `Construct<{Req}>` implementation",
    note = "Closures must take the request by reference: `|req: &{Req}| ...`."
)]
pub trait Construct<Req>: Send + Sync + 'static {
    /// The stage output, usually `Result<Source, E>` or `Outcome<Source>`.
    type Output: IntoOutcome;

    /// Extract the source value.
    fn construct(&self, request: &Req) -> impl Future<Output = Self::Output> + Send;
}

impl<F, Req, Out, Fut> Construct<Req> for F
where
    F: Fn(&Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoOutcome,
{
    type Output = Out;

    fn construct(&self, request: &Req) -> impl Future<Output = Self::Output> + Send {
        (self)(request)
    }
}

/// Runs business logic on the source value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle input of type `{In}`",
    label = "missing `Callback<{In}>` implementation",
    note = "Callbacks must implement the `call` method for the input type `{In}`."
)]
pub trait Callback<In>: Send + Sync + 'static {
    /// The stage output, usually `Result<Target, E>` or `Outcome<Target>`.
    type Output: IntoOutcome;

    /// Executes the business logic.
    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send;
}

impl<F, In, Out, Fut> Callback<In> for F
where
    F: Fn(In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoOutcome,
{
    type Output = Out;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        (self)(input)
    }
}

/// Shapes the target value into the response value.
///
/// The stage sees the request and may write to the response channel itself;
/// if it does, the pipeline writes nothing further.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot destruct `{In}`",
    label = "missing `Destruct<{In}, {Req}, {Res}>` implementation",
    note = "Closures must take borrowed arguments: `|target: &{In}, req: &{Req}, res: &mut {Res}| ...`."
)]
pub trait Destruct<In, Req, Res>: Send + Sync + 'static {
    /// The stage output; its value must serialize into the response body.
    type Output: IntoOutcome<Value: Serialize>;

    /// Shape the response value.
    fn destruct(
        &self,
        target: &In,
        request: &Req,
        response: &mut Res,
    ) -> impl Future<Output = Self::Output> + Send;
}

impl<F, In, Req, Res, Out, Fut> Destruct<In, Req, Res> for F
where
    F: Fn(&In, &Req, &mut Res) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
    Out: IntoOutcome<Value: Serialize>,
{
    type Output = Out;

    fn destruct(
        &self,
        target: &In,
        request: &Req,
        response: &mut Res,
    ) -> impl Future<Output = Self::Output> + Send {
        (self)(target, request, response)
    }
}

/// The default destruct stage: forwards the target unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<In, Req, Res> Destruct<In, Req, Res> for PassThrough
where
    In: Serialize + Sync,
    Req: Sync,
    Res: Send,
{
    type Output = Result<Value, BoxError>;

    fn destruct(
        &self,
        target: &In,
        _request: &Req,
        _response: &mut Res,
    ) -> impl Future<Output = Self::Output> + Send {
        let value = serde_json::to_value(target).map_err(|source| {
            Box::new(StageError::Serialize {
                stage: Stage::Destruct,
                source,
            }) as BoxError
        });
        std::future::ready(value)
    }
}
