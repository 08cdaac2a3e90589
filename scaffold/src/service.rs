//! Tower integration for scaffold.
//!
//! [`ScaffoldService`] runs a pipeline as a `tower::Service`. The response is
//! buffered in memory and returned as a [`Reply`] instead of being written to
//! a transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use scaffold::{Reply, ScaffoldService};
//! use tower::Service;
//!
//! let mut service = ScaffoldService::new(handler);
//! match service.call(request).await? {
//!     Reply::Responded { body, code } => { /* send it */ }
//!     Reply::Delegated(error) => { /* fall through to the next route */ }
//! }
//! ```

use crate::pipeline::Scaffold;
use scaffold_core::{
    Callback, Construct, Destruct, Disposition, SourceOf, StructuredError, TargetOf,
};
use scaffold_std::BufferedResponse;
use serde::Serialize;
use serde_json::Value;
use std::{
    convert::Infallible,
    future::Future,
    marker::PhantomData,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::Service;

/// What a pipeline produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A response was written.
    Responded {
        /// Response body.
        body: Value,
        /// Transport status code.
        code: u16,
    },
    /// The pipeline delegated to the next handler.
    Delegated(Option<StructuredError>),
}

impl Reply {
    fn from_parts(disposition: Disposition, mut response: BufferedResponse) -> Self {
        match disposition {
            Disposition::Delegated { error } => Reply::Delegated(error),
            Disposition::Responded { .. } | Disposition::Closed => match response.take() {
                Some((body, code)) => Reply::Responded { body, code },
                None => Reply::Delegated(None),
            },
        }
    }
}

/// Wraps a [`Scaffold`] as a tower `Service`.
///
/// Clones share the pipeline.
pub struct ScaffoldService<S, Req> {
    scaffold: Arc<S>,
    _marker: PhantomData<fn(Req)>,
}

impl<S, Req> ScaffoldService<S, Req> {
    /// Create a service around `scaffold`.
    pub fn new(scaffold: S) -> Self {
        Self {
            scaffold: Arc::new(scaffold),
            _marker: PhantomData,
        }
    }

    /// Get a reference to the inner pipeline.
    pub fn inner(&self) -> &S {
        &self.scaffold
    }
}

impl<S, Req> Clone for ScaffoldService<S, Req> {
    fn clone(&self) -> Self {
        Self {
            scaffold: Arc::clone(&self.scaffold),
            _marker: PhantomData,
        }
    }
}

impl<C, K, D, Req> Service<Req> for ScaffoldService<Scaffold<C, K, D>, Req>
where
    Req: Send + Sync + 'static,
    C: Construct<Req>,
    K: Callback<SourceOf<C, Req>>,
    TargetOf<K, SourceOf<C, Req>>: Serialize + Sync,
    D: Destruct<TargetOf<K, SourceOf<C, Req>>, Req, BufferedResponse>,
{
    type Response = Reply;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Pipelines hold no per-request resources.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Req) -> Self::Future {
        let scaffold = Arc::clone(&self.scaffold);
        Box::pin(async move {
            let mut response = BufferedResponse::new();
            let disposition = scaffold
                .handle(&request, &mut response, |_error: Option<StructuredError>| {})
                .await;
            Ok(Reply::from_parts(disposition, response))
        })
    }
}

impl<C, K, D> Scaffold<C, K, D> {
    /// Wrap this pipeline as a tower `Service` over `Req`.
    pub fn into_service<Req>(self) -> ScaffoldService<Self, Req> {
        ScaffoldService::new(self)
    }
}
