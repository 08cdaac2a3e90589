//! Stage execution and failure resolution.
//!
//! The executor runs one stage, catches whatever it raises and turns every
//! failure into the [`Action`] that settles the request. It never touches the
//! transport itself; the pipeline performs the action.

use crate::config::ScaffoldConfig;
use futures::FutureExt;
use scaffold_core::{Action, Classified, IntoOutcome, Stage, classify, classify_panic};
use std::{future::Future, panic::AssertUnwindSafe};

/// Result of running a single stage.
#[derive(Debug)]
pub enum Executed<T> {
    /// The stage succeeded; pass the value on.
    Value(T),
    /// The stage failed. No further stage may run; perform the action and stop.
    Suppressed(Action),
}

impl<T> Executed<T> {
    /// Returns `true` for [`Executed::Suppressed`].
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Executed::Suppressed(_))
    }
}

/// Runs stages and resolves their failures according to the pipeline config.
///
/// Built fresh for every request; it holds only the two error-policy flags.
#[derive(Debug, Clone, Copy)]
pub struct StageExecutor {
    invoke_next_on_error: bool,
    pass_pure_errors: bool,
}

impl StageExecutor {
    /// Create an executor with the error policy of `config`.
    pub fn new(config: &ScaffoldConfig) -> Self {
        Self {
            invoke_next_on_error: config.invoke_next_on_error,
            pass_pure_errors: config.pass_pure_errors,
        }
    }

    /// Run one stage.
    ///
    /// `invoke` starts the stage and returns its future. A panic while
    /// starting the stage or while polling its future is caught and
    /// classified like a returned error. Requires `panic = "unwind"`.
    pub async fn execute<F, Fut, O>(&self, stage: Stage, invoke: F) -> Executed<O::Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = O>,
        O: IntoOutcome,
    {
        let future = match std::panic::catch_unwind(AssertUnwindSafe(invoke)) {
            Ok(future) => future,
            Err(payload) => {
                return Executed::Suppressed(self.resolve(stage, classify_panic(stage, payload)));
            }
        };

        let output = match AssertUnwindSafe(future).catch_unwind().await {
            Ok(output) => output,
            Err(payload) => {
                return Executed::Suppressed(self.resolve(stage, classify_panic(stage, payload)));
            }
        };

        match output.into_outcome() {
            Ok(value) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%stage, "stage completed");
                Executed::Value(value)
            }
            Err(err) => Executed::Suppressed(self.resolve(stage, classify(err))),
        }
    }

    /// Decide the terminal action for a classified failure.
    ///
    /// Structured errors keep their own code; anything else becomes a
    /// `ServerError` (500). With `invoke_next_on_error` the error is delegated
    /// instead of written.
    pub fn resolve(&self, stage: Stage, failure: Classified) -> Action {
        #[cfg(feature = "tracing")]
        {
            match &failure {
                Classified::Structured(err) => {
                    tracing::warn!(%stage, code = err.code, status = %err.status, "stage failed");
                }
                Classified::Unclassified(err) => {
                    tracing::error!(%stage, error = %err, "stage failed with an unclassified error");
                }
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = stage;

        let err = failure.into_structured(self.pass_pure_errors);
        if self.invoke_next_on_error {
            Action::Delegate(Some(err))
        } else {
            Action::respond_error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_core::{BoxError, Outcome, StructuredError};
    use serde_json::json;

    fn executor(invoke_next_on_error: bool, pass_pure_errors: bool) -> StageExecutor {
        StageExecutor::new(
            &ScaffoldConfig::new()
                .invoke_next_on_error(invoke_next_on_error)
                .pass_pure_errors(pass_pure_errors),
        )
    }

    fn respond(code: u16, body: serde_json::Value) -> Action {
        Action::Respond { body, code }
    }

    #[tokio::test]
    async fn value_passes_through() {
        let result = executor(false, false)
            .execute(Stage::Callback, || async { Ok::<_, BoxError>(7) })
            .await;
        assert!(matches!(result, Executed::Value(7)));
    }

    #[tokio::test]
    async fn structured_error_is_written_with_own_code() {
        let result = executor(false, false)
            .execute(Stage::Construct, || async {
                Err::<(), _>(StructuredError::new(400, "BadRequest"))
            })
            .await;
        match result {
            Executed::Suppressed(action) => assert_eq!(
                action,
                respond(400, json!({ "code": 400, "status": "BadRequest" }))
            ),
            Executed::Value(_) => panic!("expected suppression"),
        }
    }

    #[tokio::test]
    async fn structured_error_is_delegated() {
        let result = executor(true, false)
            .execute(Stage::Construct, || async {
                Outcome::<()>::Failure(StructuredError::new(401, "Unauthorized"))
            })
            .await;
        match result {
            Executed::Suppressed(Action::Delegate(Some(err))) => assert_eq!(err.code, 401),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn returned_json_sentinel_is_a_failure() {
        let result = executor(false, false)
            .execute(Stage::Callback, || async {
                json!({ "code": 409, "status": "Conflict" })
            })
            .await;
        match result {
            Executed::Suppressed(Action::Respond { code, .. }) => assert_eq!(code, 409),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn foreign_error_becomes_server_error() {
        let result = executor(false, false)
            .execute(Stage::Callback, || async {
                Err::<(), _>(std::io::Error::other("disk on fire"))
            })
            .await;
        match result {
            Executed::Suppressed(action) => assert_eq!(
                action,
                respond(500, json!({ "code": 500, "status": "ServerError" }))
            ),
            Executed::Value(_) => panic!("expected suppression"),
        }
    }

    #[tokio::test]
    async fn pure_errors_keep_original() {
        let result = executor(true, true)
            .execute(Stage::Callback, || async { Err::<(), BoxError>("boom".into()) })
            .await;
        match result {
            Executed::Suppressed(Action::Delegate(Some(err))) => {
                assert_eq!(err.code, 500);
                assert_eq!(err.original(), Some(&json!("boom")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn panic_while_polling_is_caught() {
        let result = executor(false, true)
            .execute(Stage::Callback, || async {
                if true {
                    panic!("exploded");
                }
                Ok::<(), BoxError>(())
            })
            .await;
        match result {
            Executed::Suppressed(Action::Respond { body, code }) => {
                assert_eq!(code, 500);
                assert_eq!(body["error"], json!("callback stage panicked: exploded"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn panic_while_starting_is_caught() {
        let result = executor(false, false)
            .execute(Stage::Construct, || -> std::future::Ready<Result<(), BoxError>> {
                panic!("before the future exists")
            })
            .await;
        assert!(result.is_suppressed());
    }

    #[tokio::test]
    async fn structured_panic_payload_keeps_code() {
        let result = executor(false, false)
            .execute(Stage::Destruct, || async {
                if true {
                    std::panic::panic_any(StructuredError::new(403, "Forbidden"));
                }
                Ok::<(), BoxError>(())
            })
            .await;
        match result {
            Executed::Suppressed(Action::Respond { code, .. }) => assert_eq!(code, 403),
            other => panic!("unexpected {other:?}"),
        }
    }
}
