//! # Transport Seam
//!
//! The pipeline never talks to a server directly. A transport adapter hands
//! it a [`ResponseChannel`] to write to and a [`NextHandler`] to delegate to,
//! and the pipeline settles every request with exactly one [`Action`].

use crate::structured::StructuredError;
use serde_json::Value;

/// The outward response primitive of a transport.
///
/// # Example
///
/// ```rust
/// use scaffold_core::ResponseChannel;
/// use serde_json::Value;
///
/// #[derive(Default)]
/// struct Captured {
///     sent: Option<(u16, Value)>,
/// }
///
/// impl ResponseChannel for Captured {
///     fn write(&mut self, body: Value, code: u16) {
///         self.sent = Some((code, body));
///     }
///
///     fn is_closed(&self) -> bool {
///         self.sent.is_some()
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ResponseChannel`",
    label = "missing `ResponseChannel` implementation",
    note = "Transport adapters must implement `write` and `is_closed`."
)]
pub trait ResponseChannel: Send {
    /// Send `body` with the transport status `code`.
    fn write(&mut self, body: Value, code: u16);

    /// Whether a response has already been sent on this channel.
    fn is_closed(&self) -> bool;
}

impl<R: ResponseChannel + ?Sized> ResponseChannel for &mut R {
    fn write(&mut self, body: Value, code: u16) {
        (**self).write(body, code);
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// The delegate-to-next-handler primitive of a transport.
///
/// `call` consumes the handler, so a request can delegate at most once.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `NextHandler`",
    label = "missing `NextHandler` implementation",
    note = "Use a closure `|error: Option<StructuredError>| ...` or implement `NextHandler`."
)]
pub trait NextHandler: Send {
    /// Continue with the next handler, reporting `error` if there is one.
    fn call(self, error: Option<StructuredError>);
}

impl<F> NextHandler for F
where
    F: FnOnce(Option<StructuredError>) + Send,
{
    fn call(self, error: Option<StructuredError>) {
        self(error)
    }
}

/// The single terminal action of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Write `body` to the response channel with status `code`.
    Respond {
        /// Response body.
        body: Value,
        /// Transport status code.
        code: u16,
    },
    /// Hand control to the next handler.
    Delegate(Option<StructuredError>),
}

impl Action {
    /// Respond with a structured error, using its own code.
    pub fn respond_error(err: &StructuredError) -> Self {
        Action::Respond {
            body: err.to_value(),
            code: err.code,
        }
    }

    /// Returns `true` for [`Action::Delegate`].
    pub fn is_delegate(&self) -> bool {
        matches!(self, Action::Delegate(_))
    }
}

/// How a request was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// The pipeline wrote a response with this code.
    Responded {
        /// Transport status code.
        code: u16,
    },
    /// The pipeline delegated to the next handler.
    Delegated {
        /// The error reported downstream, if any.
        error: Option<StructuredError>,
    },
    /// The destruct stage wrote the response itself.
    Closed,
}

impl Disposition {
    /// Returns `true` if the response channel was written.
    pub fn is_responded(&self) -> bool {
        matches!(self, Disposition::Responded { .. } | Disposition::Closed)
    }
}
