//! # Error Taxonomy
//!
//! All fallible operations in this crate return [`BoardError`]. The
//! variants split along the lines callers need for policy decisions:
//!
//! - **Config**: bad or missing credentials, or a config shape that does
//!   not match the requested mode. Always raised synchronously, before any
//!   request is attempted — the client never silently sends
//!   unauthenticated requests.
//! - **Status / Network / Parse**: the transport family. A non-2xx
//!   response carries its status and body for logging; network and
//!   response-decode failures wrap the underlying error. None of these are
//!   retried internally: retry and fallback policy belongs to the caller,
//!   which keeps the client composable with arbitrary backoff strategies.
//! - **Cancelled**: the caller's cancellation signal fired mid-request.
//!   Distinct from the transport family so fallback logic can tell an
//!   aborted call from a failed one.
//! - **Unsupported**: the operation does not exist on this transport
//!   variant (e.g. reading through the write-only key). Raised before any
//!   I/O.
//!
//! Codec faults do not appear here at all: encoding is total and degrades
//! unknown input to blank tiles instead of failing.

use thiserror::Error;

/// Errors surfaced by the transport clients and factory.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Bad or missing credentials, or mode/config shape mismatch.
    #[error("configuration error: {0}")]
    Config(String),

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, verbatim, for diagnostics.
        body: String,
    },

    /// The request never completed (connect, TLS, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered 2xx but the body did not match the wire contract.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The caller's cancellation signal fired before the request completed.
    #[error("request cancelled")]
    Cancelled,

    /// The operation is not available on this transport variant.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl BoardError {
    /// Convenience constructor for configuration failures.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        BoardError::Config(message.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BoardError>;
