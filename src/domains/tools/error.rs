//! Tool-specific error types.

use thiserror::Error;

/// Errors raised while turning a tool invocation into an API request.
///
/// Everything except [`ToolError::NotFound`] is reported back to the caller as
/// an error-flagged tool result rather than a protocol error.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    NotFound(String),

    /// A required parameter was absent or not a string.
    #[error("missing or invalid required parameter '{0}'")]
    MissingParameter(&'static str),

    /// A parameter value outside its allowed set.
    #[error("invalid value '{value}' for parameter '{param}': expected one of {expected}")]
    InvalidValue {
        param: &'static str,
        value: String,
        expected: String,
    },

    /// The tool needs at least one field and none was supplied.
    #[error("at least one config field must be provided")]
    NoFields,

    /// The endpoint path references a placeholder with no bound value.
    #[error("path template '{template}' has no value for '{{{placeholder}}}'")]
    Template {
        template: &'static str,
        placeholder: String,
    },
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_value(
        param: &'static str,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        Self::InvalidValue {
            param,
            value: value.into(),
            expected: allowed.join(", "),
        }
    }
}
