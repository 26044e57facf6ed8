//! Error types for the Temp Mail client.

use thiserror::Error;

/// Error type for all Temp Mail client operations.
///
/// API-level failures (the server answered with a non-success status) are
/// distinguished from transport failures (DNS, connection refused, timeout)
/// and from decode failures (a 2xx body that does not match the expected
/// shape). The set of variants is closed; callers can match exhaustively.
#[derive(Debug, Error)]
pub enum Error {
    /// The API key was rejected (HTTP 401 or 403).
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The rate limit for this API key was exceeded (HTTP 429).
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// Server-provided error message.
        message: String,
        /// Unix timestamp at which the window resets, when the server sent it.
        reset: Option<u64>,
    },
    /// Request parameters were rejected, either client-side before any
    /// request was sent or by the server (HTTP 400 or 422).
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable description of the rejected input.
        message: String,
        /// Field-level detail from the server, when supplied.
        detail: Option<serde_json::Value>,
    },
    /// Any other non-success API response.
    #[error("api error (status {status}): {message}")]
    Api {
        /// Coarse classification of the failure.
        kind: ApiErrorKind,
        /// HTTP status code of the response.
        status: u16,
        /// Server-provided error message.
        message: String,
        /// Structured body of the error response, when it was valid JSON.
        detail: Option<serde_json::Value>,
    },
    /// The request never produced an API response: DNS failure, connection
    /// refused, TLS failure, or timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A success response carried a body that does not match the expected
    /// schema.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Classification of an [`Error::Api`] response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// HTTP 404, the resource does not exist (or was already deleted).
    NotFound,
    /// HTTP 5xx, the service itself failed.
    Server,
    /// Any other non-success status.
    Other,
}

impl Error {
    /// Returns `true` when this error is an API 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Api {
                kind: ApiErrorKind::NotFound,
                ..
            }
        )
    }
}

/// Result type for Temp Mail client operations.
pub type Result<T> = std::result::Result<T, Error>;
