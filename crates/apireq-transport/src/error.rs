//! Transport error types

use apireq_core::error_boundary;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur before a response is available to the caller.
///
/// Status codes are not errors at this layer: any response the server sends
/// back, whatever its status, is returned as an [`HttpResponse`](crate::HttpResponse).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("Timeout")]
    Timeout,

    /// The request could not be built (unsupported method, invalid URL or header)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The in-flight call was cancelled or superseded before it completed
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Generic transport error
    #[error("{0}")]
    Other(String),
}

error_boundary!(reqwest::Error => TransportError, |e| {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connection(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Http(e.to_string())
    }
});
