//! Proxmox client error types.

use thiserror::Error;

/// Errors produced by a single Proxmox API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built (bad URL, bad header value).
    #[error("creating request: {0}")]
    Build(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered outside the 2xx range.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read.
    #[error("reading response: {0}")]
    Read(#[source] reqwest::Error),

    /// The body was not a `{"data": ...}` envelope.
    #[error("parsing response: {0}")]
    Parse(#[source] serde_json::Error),
}

impl ClientError {
    /// Create a request-construction error.
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    /// HTTP status attached to this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
