//! Error types for the API client.
//!
//! # Design
//! Every failure a call can end in is a variant here, so a caller matches on
//! one enum instead of inspecting status codes. A non-2xx response whose
//! body decoded cleanly lands in `Response` with the remote payload kept
//! verbatim: the remote side's structured error is the thing the caller
//! wants, not a message about it.

use serde_json::Value;

/// Error produced by the underlying network call, passed through untouched.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `Client` calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport itself failed (connection refused, DNS, ...).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The timer won the race against the transport.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The response body is not valid structured data. Raised regardless of
    /// the response status.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but the status is outside 2xx.
    #[error("HTTP {status}: {body}")]
    Response { status: u16, body: Value },

    /// A configuration was built from something other than a JSON object.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn timeout(url: &str) -> Self {
        Error::Timeout {
            url: url.to_string(),
        }
    }

    /// Decoded payload of an application failure.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}
