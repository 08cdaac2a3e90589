//! The three-stage pipeline.
//!
//! A [`Scaffold`] runs construct → callback → destruct for every request and
//! settles it with exactly one terminal action: a response write or a
//! delegation to the next handler.
//!
//! ```text
//! Constructing ──► Invoking ──► Destructing ──► Responded | Delegated
//!      │               │              │
//!      └───────────────┴──────────────┴──► Responded | Delegated (on failure)
//! ```

use crate::{
    config::ScaffoldConfig,
    executor::{Executed, StageExecutor},
};
use scaffold_core::{
    Action, Callback, Classified, Construct, Destruct, Disposition, NextHandler, PassThrough,
    ResponseChannel, SourceOf, Stage, StageError, TargetOf, normalize_success, response_code,
};
use serde::Serialize;
use serde_json::Value;

/// A request handler built from three stages and a config.
///
/// Holds no per-request state: `handle` takes `&self`, so one `Scaffold` can
/// serve any number of concurrent requests.
///
/// # Example
///
/// ```rust
/// use scaffold::{Scaffold, StructuredError};
/// use serde_json::{Value, json};
///
/// struct Signup {
///     password: String,
/// }
///
/// let handler = Scaffold::new(
///     |req: &Signup| {
///         let password = req.password.clone();
///         async move { Ok::<_, StructuredError>(password) }
///     },
///     |password: String| async move {
///         Ok::<_, StructuredError>(json!({ "hash": format!("h({password})") }))
///     },
/// );
/// # let _ = handler;
/// ```
#[derive(Debug, Clone)]
pub struct Scaffold<C, K, D = PassThrough> {
    construct: C,
    callback: K,
    destruct: D,
    config: ScaffoldConfig,
}

impl<C, K> Scaffold<C, K, PassThrough> {
    /// Create a pipeline with the default pass-through destruct stage.
    pub fn new(construct: C, callback: K) -> Self {
        Self {
            construct,
            callback,
            destruct: PassThrough,
            config: ScaffoldConfig::default(),
        }
    }
}

impl<C, K, D> Scaffold<C, K, D> {
    /// Replace the destruct stage.
    pub fn destruct<D2>(self, destruct: D2) -> Scaffold<C, K, D2> {
        Scaffold {
            construct: self.construct,
            callback: self.callback,
            destruct,
            config: self.config,
        }
    }

    /// Replace the whole config.
    pub fn with_config(mut self, config: ScaffoldConfig) -> Self {
        self.config = config;
        self
    }

    /// Delegate failures to the next handler instead of responding.
    pub fn invoke_next_on_error(mut self, enabled: bool) -> Self {
        self.config.invoke_next_on_error = enabled;
        self
    }

    /// Expose the original failure inside `ServerError` bodies.
    pub fn pass_pure_errors(mut self, enabled: bool) -> Self {
        self.config.pass_pure_errors = enabled;
        self
    }

    /// Set the code attached to successful responses.
    pub fn success_code(mut self, code: u16) -> Self {
        self.config.success_code = code;
        self
    }

    /// Run as middleware: delegate after success instead of responding.
    pub fn middleware(mut self, enabled: bool) -> Self {
        self.config.is_middleware = enabled;
        self
    }

    /// The active config.
    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Handle one request.
    ///
    /// Exactly one of {write `response`, call `next`} happens before this
    /// returns, and the returned [`Disposition`] says which. The only
    /// exception is a destruct stage that writes `response` itself, reported
    /// as [`Disposition::Closed`].
    pub async fn handle<Req, Res, N>(&self, request: &Req, response: &mut Res, next: N) -> Disposition
    where
        Req: Sync,
        Res: ResponseChannel,
        N: NextHandler,
        C: Construct<Req>,
        K: Callback<SourceOf<C, Req>>,
        TargetOf<K, SourceOf<C, Req>>: Serialize + Sync,
        D: Destruct<TargetOf<K, SourceOf<C, Req>>, Req, Res>,
    {
        let pipeline = self.run(request, Terminal { response, next });

        #[cfg(feature = "tracing")]
        let pipeline = {
            use tracing::Instrument;
            let span = tracing::info_span!(
                "scaffold",
                name = %self.config.name.as_deref().unwrap_or("anonymous"),
                middleware = self.config.is_middleware
            );
            pipeline.instrument(span)
        };

        pipeline.await
    }

    async fn run<Req, Res, N>(&self, request: &Req, mut terminal: Terminal<'_, Res, N>) -> Disposition
    where
        Req: Sync,
        Res: ResponseChannel,
        N: NextHandler,
        C: Construct<Req>,
        K: Callback<SourceOf<C, Req>>,
        TargetOf<K, SourceOf<C, Req>>: Serialize + Sync,
        D: Destruct<TargetOf<K, SourceOf<C, Req>>, Req, Res>,
    {
        let executor = StageExecutor::new(&self.config);

        let source = match executor
            .execute(Stage::Construct, || self.construct.construct(request))
            .await
        {
            Executed::Value(source) => source,
            Executed::Suppressed(action) => return terminal.perform(action),
        };

        let target = match executor
            .execute(Stage::Callback, move || self.callback.call(source))
            .await
        {
            Executed::Value(target) => target,
            Executed::Suppressed(action) => return terminal.perform(action),
        };

        let shaped = {
            let target = &target;
            let response = terminal.response_mut();
            executor
                .execute(Stage::Destruct, move || {
                    let response = response;
                    self.destruct.destruct(target, request, response)
                })
                .await
        };

        let body = match shaped {
            Executed::Value(value) => {
                if terminal.is_closed() {
                    return terminal.closed();
                }
                if self.config.is_middleware {
                    return terminal.perform(Action::Delegate(None));
                }
                match to_body(Stage::Destruct, &value) {
                    Ok(body) => body,
                    Err(failure) => {
                        return terminal.perform(executor.resolve(Stage::Destruct, failure));
                    }
                }
            }
            Executed::Suppressed(action) => {
                if terminal.is_closed() {
                    return terminal.closed();
                }
                if let Action::Respond { .. } = action {
                    return terminal.perform(action);
                }
                // A delegated destruct failure falls back to the callback's result.
                #[cfg(feature = "tracing")]
                tracing::warn!(?action, "destruct failed; responding with the callback result");
                if self.config.is_middleware {
                    return terminal.perform(Action::Delegate(None));
                }
                match to_body(Stage::Callback, &target) {
                    Ok(body) => body,
                    Err(failure) => {
                        return terminal.perform(executor.resolve(Stage::Callback, failure));
                    }
                }
            }
        };

        let success_code = self.config.success_code;
        let body = normalize_success(body, success_code);
        let code = response_code(&body, success_code);
        terminal.perform(Action::Respond { body, code })
    }
}

/// Build a pipeline from a construct and a callback stage.
///
/// Shorthand for [`Scaffold::new`].
pub fn scaffold<C, K>(construct: C, callback: K) -> Scaffold<C, K> {
    Scaffold::new(construct, callback)
}

fn to_body<T: Serialize>(stage: Stage, value: &T) -> Result<Value, Classified> {
    serde_json::to_value(value).map_err(|source| {
        Classified::Unclassified(Box::new(StageError::Serialize { stage, source }))
    })
}

/// The per-request transport pair.
///
/// `perform` and `closed` consume it, so a request settles exactly once.
struct Terminal<'a, Res, N> {
    response: &'a mut Res,
    next: N,
}

impl<Res: ResponseChannel, N: NextHandler> Terminal<'_, Res, N> {
    fn response_mut(&mut self) -> &mut Res {
        self.response
    }

    fn is_closed(&self) -> bool {
        self.response.is_closed()
    }

    fn closed(self) -> Disposition {
        #[cfg(feature = "tracing")]
        tracing::debug!("response already written by the destruct stage");
        Disposition::Closed
    }

    fn perform(self, action: Action) -> Disposition {
        match action {
            Action::Respond { body, code } => {
                if self.response.is_closed() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code, "response channel already closed; dropping response");
                    return Disposition::Closed;
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(code, "responding");
                self.response.write(body, code);
                Disposition::Responded { code }
            }
            Action::Delegate(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = ?error, "delegating to next handler");
                let disposition = Disposition::Delegated {
                    error: error.clone(),
                };
                NextHandler::call(self.next, error);
                disposition
            }
        }
    }
}
