//! Time-limited stages.
//!
//! **Note**: This module requires the `tokio` runtime.

use scaffold_core::{BoxError, Callback, Construct, IntoOutcome, StageError, StructuredError};
use std::time::Duration;
use tokio::time::timeout;

/// Status code of a timed-out stage.
pub const TIMEOUT_CODE: u16 = 504;

/// Status label of a timed-out stage.
pub const TIMEOUT_STATUS: &str = "GatewayTimeout";

/// A stage that fails if the wrapped stage does not complete in time.
///
/// A timed-out stage fails with a `504 GatewayTimeout` structured error and
/// the wrapped future is dropped.
///
/// # Example
///
/// ```rust,ignore
/// use scaffold_std::timeout::Timeout;
///
/// let handler = scaffold(extract, Timeout::secs(hash_password, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Timeout<S> {
    inner: S,
    duration: Duration,
}

impl<S> Timeout<S> {
    /// Wrap `inner` with a time limit.
    pub fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// Wrap `inner` with a limit in seconds.
    pub fn secs(inner: S, seconds: u64) -> Self {
        Self::new(inner, Duration::from_secs(seconds))
    }

    /// Wrap `inner` with a limit in milliseconds.
    pub fn millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the configured limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get a reference to the wrapped stage.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn expired(&self) -> BoxError {
        #[cfg(feature = "tracing")]
        {
            tracing::warn!(limit = ?self.duration, "stage timed out");
        }
        let millis = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX);
        Box::new(
            StructuredError::new(TIMEOUT_CODE, TIMEOUT_STATUS)
                .with_field("timeout_ms", millis)
                .with_field("message", StageError::TimedOut(self.duration).to_string()),
        )
    }
}

impl<In, S> Callback<In> for Timeout<S>
where
    In: Send + 'static,
    S: Callback<In>,
{
    type Output = Result<<S::Output as IntoOutcome>::Value, BoxError>;

    async fn call(&self, input: In) -> Self::Output {
        match timeout(self.duration, self.inner.call(input)).await {
            Ok(output) => output.into_outcome(),
            Err(_) => Err(self.expired()),
        }
    }
}

impl<Req, S> Construct<Req> for Timeout<S>
where
    Req: Sync,
    S: Construct<Req>,
{
    type Output = Result<<S::Output as IntoOutcome>::Value, BoxError>;

    async fn construct(&self, request: &Req) -> Self::Output {
        match timeout(self.duration, self.inner.construct(request)).await {
            Ok(output) => output.into_outcome(),
            Err(_) => Err(self.expired()),
        }
    }
}
