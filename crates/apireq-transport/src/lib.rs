//! Transport abstraction layer for apireq
//!
//! Provides the capability the request pipeline consumes to put bytes on the
//! wire: send a request description, get back a status code and body, or a
//! transport error.
//!
//! # Architecture
//!
//! - **Transport trait**: Generic interface for any transport implementation
//! - **HTTP transport**: Single-shot HTTP client via reqwest
//! - **Error handling**: `TransportError` for everything below the protocol layer

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # Usage
//!
//! ```ignore
//! use apireq_transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new("GET", "https://api.example.com/v1/status");
//! let response = transport.send_http(request).await?;
//! ```

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Transport};
