//! Centralized observability utilities for structured logging
//!
//! Every pipeline call runs inside a `request` span carrying the requester's
//! label, so each event below is prefixed with it by any subscriber that
//! prints span context. The spans are opened at ERROR level so that no
//! level filter drops the label from the events it lets through. Without a
//! subscriber installed all of this is a no-op.

use apireq_transport::HttpRequest;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, warn};
use uuid::Uuid;

use crate::error::RequestError;
use crate::transform::TransformPolicy;

/// Open the span for one call of the request pipeline.
pub(crate) fn request_span(label: &str, request: &HttpRequest) -> Span {
    tracing::error_span!(
        "request",
        label = %label,
        request_id = %Uuid::new_v4(),
        method = %request.method,
        url = %request.url,
    )
}

/// Open the span for one transform-aware call.
pub(crate) fn transform_span(label: &str, policy: TransformPolicy) -> Span {
    tracing::error_span!(
        "transformed",
        label = %label,
        transform_outgoing = policy.transform_outgoing,
        transform_incoming = policy.transform_incoming,
    )
}

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub(crate) struct RequestMetadata {
    /// Transport the request is dispatched on
    pub transport: &'static str,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Number of headers after merging configured headers
    pub header_count: usize,
}

impl RequestMetadata {
    pub(crate) fn from_request(transport: &'static str, request: &HttpRequest) -> Self {
        Self {
            transport,
            body_size: request.body.as_ref().map(Vec::len),
            header_count: request.headers.len(),
        }
    }

    /// Log request being sent
    pub(crate) fn log_request(&self) {
        debug!(
            transport = self.transport,
            body_size = self.body_size,
            header_count = self.header_count,
            "Sending HTTP request"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub(crate) struct ResponseMetadata {
    /// HTTP status code, if the response had one
    pub status: Option<u16>,
    /// Response body size in bytes
    pub body_size: usize,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    pub(crate) fn new(status: Option<u16>, body_size: usize, elapsed: Duration) -> Self {
        Self {
            status,
            body_size,
            elapsed,
        }
    }

    /// Log accepted response
    pub(crate) fn log_accepted(&self) {
        info!(
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            body_size = self.body_size,
            "HTTP request succeeded"
        );
    }

    /// Log rejected status
    pub(crate) fn log_rejected(&self) {
        warn!(
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            body_size = self.body_size,
            "Response status is not 200"
        );
    }
}

/// Log a failure at the transport layer
pub(crate) fn log_transport_error(error: &dyn std::error::Error, elapsed: Duration) {
    warn!(
        elapsed_ms = elapsed.as_millis() as u64,
        error = %error,
        "Transport failed"
    );
}

/// Log a failed decode. Debug level: a transform-aware caller may still recover.
pub(crate) fn log_decode_error(error: &dyn std::error::Error, body_size: usize) {
    debug!(body_size = body_size, error = %error, "Failed to decode response body");
}

/// Log the terminal outcome of a call
pub(crate) fn log_outcome<T>(result: &Result<T, RequestError>) {
    match result {
        Ok(_) => debug!("Request completed"),
        Err(err) => warn!(error_kind = %err.kind(), error = %err, "Request failed"),
    }
}

/// Timer for measuring request duration
pub(crate) struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "trace")]
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
