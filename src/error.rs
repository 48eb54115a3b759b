//! Error types for request execution.
//!
//! Configuration calls on [`Client`](crate::Client) never return errors; they
//! log and degrade to no-ops. Only building and sending a request can fail.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`Request::send`](crate::Request::send).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request method is not a valid HTTP token.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// A header name or value was rejected.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The request was sent without a URL.
    #[error("request has no URL")]
    MissingUrl,

    /// The round-trip exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or protocol failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The underlying connection pool could not be built.
    #[error("failed to build transport: {0}")]
    Build(String),
}

/// Result type for request operations.
pub type ClientResult<T> = Result<T, ClientError>;
