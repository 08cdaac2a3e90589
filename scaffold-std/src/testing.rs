//! Testing utilities for scaffold.
//!
//! This module provides recording transports and stages that make pipeline
//! behavior observable from a test.
//!
//! # Features
//!
//! - [`RecordingResponse`]: A response channel that records every write
//! - [`RecordingNext`]: A next handler that records every delegation
//! - [`CountingCallback`]: A callback that counts invocations and echoes its input

use scaffold_core::{Callback, NextHandler, ResponseChannel, StructuredError};
use serde_json::Value;
use std::{
    convert::Infallible,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Response
// ============================================================================

/// A response channel that records every write.
///
/// Unlike a real transport it accepts writes on a closed channel, so a test
/// can detect a pipeline that responds twice.
///
/// # Example
///
/// ```rust,ignore
/// let response = RecordingResponse::new();
/// let mut channel = response.clone();
///
/// handler.handle(&request, &mut channel, RecordingNext::new()).await;
///
/// assert_eq!(response.write_count(), 1);
/// assert_eq!(response.last_code(), Some(200));
/// ```
#[derive(Clone, Default)]
pub struct RecordingResponse {
    writes: Arc<Mutex<Vec<(Value, u16)>>>,
}

impl RecordingResponse {
    /// Create a new, open recording response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of all recorded writes.
    pub fn writes(&self) -> Vec<(Value, u16)> {
        self.writes.lock().unwrap().clone()
    }

    /// Get the number of recorded writes.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// The most recent body.
    pub fn last_body(&self) -> Option<Value> {
        self.writes.lock().unwrap().last().map(|(body, _)| body.clone())
    }

    /// The most recent status code.
    pub fn last_code(&self) -> Option<u16> {
        self.writes.lock().unwrap().last().map(|(_, code)| *code)
    }
}

impl ResponseChannel for RecordingResponse {
    fn write(&mut self, body: Value, code: u16) {
        self.writes.lock().unwrap().push((body, code));
    }

    fn is_closed(&self) -> bool {
        !self.writes.lock().unwrap().is_empty()
    }
}

// ============================================================================
// Recording Next
// ============================================================================

/// A next handler that records every delegation.
///
/// Each pipeline run consumes one clone; all clones share the record.
#[derive(Clone, Default)]
pub struct RecordingNext {
    calls: Arc<Mutex<Vec<Option<StructuredError>>>>,
}

impl RecordingNext {
    /// Create a new recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded delegations.
    pub fn calls(&self) -> Vec<Option<StructuredError>> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of delegations.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The error of the most recent delegation, if it carried one.
    pub fn last_error(&self) -> Option<StructuredError> {
        self.calls.lock().unwrap().last().cloned().flatten()
    }
}

impl NextHandler for RecordingNext {
    fn call(self, error: Option<StructuredError>) {
        self.calls.lock().unwrap().push(error);
    }
}

// ============================================================================
// Counting Callback
// ============================================================================

/// A callback that counts invocations and passes its input through.
///
/// Useful for asserting that a failed construct stage stops the pipeline.
#[derive(Clone, Default)]
pub struct CountingCallback {
    count: Arc<AtomicUsize>,
}

impl CountingCallback {
    /// Create a new counting callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<In: Send + 'static> Callback<In> for CountingCallback {
    type Output = Result<In, Infallible>;

    async fn call(&self, input: In) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(input)
    }
}
