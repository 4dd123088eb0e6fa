//! HTTP transport implementation
//!
//! Provides a reqwest-backed client that implements the Transport trait.
//! Each call is a single exchange; timeouts are the only policy applied here.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
