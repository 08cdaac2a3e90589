//! An in-memory response channel.

use scaffold_core::ResponseChannel;
use serde_json::Value;

/// A response channel that keeps the response in memory.
///
/// Used by adapters that produce the response as a return value (such as a
/// `tower::Service`) instead of writing to a socket. Only the first write is
/// kept; later writes are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferedResponse {
    sent: Option<(Value, u16)>,
}

impl BufferedResponse {
    /// Create an empty, open channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// The written body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.sent.as_ref().map(|(body, _)| body)
    }

    /// The written status code, if any.
    pub fn code(&self) -> Option<u16> {
        self.sent.as_ref().map(|(_, code)| *code)
    }

    /// Take the written body and code, reopening the channel.
    pub fn take(&mut self) -> Option<(Value, u16)> {
        self.sent.take()
    }
}

impl ResponseChannel for BufferedResponse {
    fn write(&mut self, body: Value, code: u16) {
        if self.sent.is_some() {
            #[cfg(feature = "tracing")]
            {
                tracing::warn!(code, "ignoring write to a closed response channel");
            }
            return;
        }
        self.sent = Some((body, code));
    }

    fn is_closed(&self) -> bool {
        self.sent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_first_write() {
        let mut response = BufferedResponse::new();
        assert!(!response.is_closed());

        response.write(json!({ "a": 1 }), 200);
        response.write(json!({ "b": 2 }), 500);

        assert!(response.is_closed());
        assert_eq!(response.code(), Some(200));
        assert_eq!(response.body(), Some(&json!({ "a": 1 })));
    }

    #[test]
    fn take_reopens() {
        let mut response = BufferedResponse::new();
        response.write(json!(null), 204);
        assert_eq!(response.take(), Some((json!(null), 204)));
        assert!(!response.is_closed());
    }
}
