//! Pipeline configuration.

use scaffold_core::SUCCESS_CODE;
use serde::{Deserialize, Serialize};

/// Per-pipeline configuration, fixed when the pipeline is built.
///
/// Every field has a default, so a partial config file deserializes cleanly:
///
/// ```rust
/// use scaffold::ScaffoldConfig;
///
/// let config: ScaffoldConfig =
///     serde_json::from_str(r#"{ "invoke_next_on_error": true }"#).unwrap();
/// assert!(config.invoke_next_on_error);
/// assert_eq!(config.success_code, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Delegate failures to the next handler instead of responding with them.
    pub invoke_next_on_error: bool,
    /// Expose the original failure in the `error` field of a `ServerError`.
    pub pass_pure_errors: bool,
    /// Code attached to successful responses that don't carry their own.
    pub success_code: u16,
    /// Delegate to the next handler after success instead of responding.
    pub is_middleware: bool,
    /// Name recorded on the request span, if any.
    pub name: Option<String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            invoke_next_on_error: false,
            pass_pure_errors: false,
            success_code: SUCCESS_CODE,
            is_middleware: false,
            name: None,
        }
    }
}

impl ScaffoldConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`invoke_next_on_error`](Self::invoke_next_on_error).
    pub fn invoke_next_on_error(mut self, enabled: bool) -> Self {
        self.invoke_next_on_error = enabled;
        self
    }

    /// Set [`pass_pure_errors`](Self::pass_pure_errors).
    pub fn pass_pure_errors(mut self, enabled: bool) -> Self {
        self.pass_pure_errors = enabled;
        self
    }

    /// Set [`success_code`](Self::success_code).
    pub fn success_code(mut self, code: u16) -> Self {
        self.success_code = code;
        self
    }

    /// Set [`is_middleware`](Self::is_middleware).
    pub fn middleware(mut self, enabled: bool) -> Self {
        self.is_middleware = enabled;
        self
    }

    /// Name the pipeline in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
