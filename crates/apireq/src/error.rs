//! Error types for the request pipeline
//!
//! Every call ends in exactly one value or one [`RequestError`]. The variants
//! separate the three layers a failure can come from: the transport (no
//! response at all), the protocol (a response, but not the one we accept),
//! and the payload (the body could not be turned into the requested type).

use apireq_core::codec::DecodeError;
use apireq_transport::TransportError;
use std::fmt;
use thiserror::Error;

use crate::transform::TransformError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Classified failure of a single pipeline call.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network, timeout or cancellation at the transport layer.
    #[error("transport failed: {0}")]
    TransportFailed(#[source] TransportError),

    /// The response carried a status other than 200, or no status at all.
    #[error("unexpected response status: {}", fmt_status(.status))]
    StatusNotOk {
        /// Observed status, `None` if the response had no status code
        status: Option<u16>,
    },

    /// The body could not be decoded into the requested type.
    ///
    /// `body` holds exactly the bytes the decoder rejected, so a later stage
    /// can work on them without fetching again.
    #[error("failed to decode response body ({} bytes): {source}", .body.len())]
    DecodeFailed {
        /// The undecodable bytes
        body: Vec<u8>,
        /// Why decoding failed
        #[source]
        source: DecodeError,
    },

    /// An outgoing transform was requested but the request has no body.
    #[error("outgoing transform requested but the request has no body")]
    BodyMissing,

    /// The payload transform could not process the bytes.
    #[error("payload transform failed: {0}")]
    TransformFailed(#[source] TransformError),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "missing".to_string(),
    }
}

/// Fieldless discriminant of [`RequestError`], for matching and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RequestError::TransportFailed`]
    TransportFailed,
    /// See [`RequestError::StatusNotOk`]
    StatusNotOk,
    /// See [`RequestError::DecodeFailed`]
    DecodeFailed,
    /// See [`RequestError::BodyMissing`]
    BodyMissing,
    /// See [`RequestError::TransformFailed`]
    TransformFailed,
}

impl ErrorKind {
    /// Stable snake_case name, used as the `error_kind` field in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransportFailed => "transport_failed",
            Self::StatusNotOk => "status_not_ok",
            Self::DecodeFailed => "decode_failed",
            Self::BodyMissing => "body_missing",
            Self::TransformFailed => "transform_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportFailed(_) => ErrorKind::TransportFailed,
            Self::StatusNotOk { .. } => ErrorKind::StatusNotOk,
            Self::DecodeFailed { .. } => ErrorKind::DecodeFailed,
            Self::BodyMissing => ErrorKind::BodyMissing,
            Self::TransformFailed(_) => ErrorKind::TransformFailed,
        }
    }

    /// The undecodable bytes, if this is a decode failure.
    pub fn undecoded_body(&self) -> Option<&[u8]> {
        match self {
            Self::DecodeFailed { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Errors raised while assembling a configuration or executor.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Header name rejected by HTTP syntax rules.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    /// Header value rejected by HTTP syntax rules.
    #[error("Invalid header value for '{0}'")]
    InvalidHeaderValue(String),

    /// The default HTTP transport could not be built.
    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}
