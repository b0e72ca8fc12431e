//! Error types for the transport layer.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while fetching rows from a remote endpoint.
///
/// None of these escape the provider's public operations; they are
/// contained at the orchestration boundary and surfaced only through the
/// `on_response_error` hook.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error (connect, send, or read failure).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("http status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was cancelled through the caller-supplied token.
    #[error("request cancelled")]
    Cancelled,

    /// The provider was constructed without a transport.
    #[error("no transport configured")]
    NotConfigured,
}
