//! Structured decoding of response payloads.

mod decoder;

pub use decoder::{DecodeError, Decoder, JsonDecoder};
