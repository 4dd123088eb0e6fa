#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the apireq request pipeline.
//!
//! This crate provides the pieces shared by the transport and executor
//! crates:
//!
//! - **Body decoding** via the `Decoder` capability
//!   - `JsonDecoder` as the default serde_json-backed implementation
//!   - `DecodeError` separating malformed payloads from shape mismatches
//! - **Declarative error boundaries** via the `error_boundary!` macro
//!
//! # Examples
//!
//! ```rust
//! use apireq_core::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Point {
//!     x: i32,
//! }
//!
//! let point: Point = JsonDecoder.decode(br#"{"x":1}"#).unwrap();
//! assert_eq!(point.x, 1);
//! ```

pub mod codec;
pub mod error;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use apireq_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::codec::{DecodeError, Decoder, JsonDecoder};
    pub use crate::error_boundary;
}
