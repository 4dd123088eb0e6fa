use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{CryptoMaterial, PayloadTransform, TransformError};

/// Pass-through transform: both directions return the input unchanged.
///
/// Useful as the default for executors whose endpoints never encode
/// payloads, and as a stand-in while a real cipher is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl PayloadTransform for IdentityTransform {
    fn encode(
        &self,
        _material: Option<&CryptoMaterial>,
        plain: &[u8],
    ) -> Result<Vec<u8>, TransformError> {
        Ok(plain.to_vec())
    }

    fn decode(
        &self,
        _material: Option<&CryptoMaterial>,
        encoded: &[u8],
    ) -> Result<Vec<u8>, TransformError> {
        Ok(encoded.to_vec())
    }
}

/// Standard (padded) base64 armor.
///
/// Ignores crypto material. Decoding trims surrounding ASCII whitespace, so
/// a body with a trailing newline is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Transform;

impl PayloadTransform for Base64Transform {
    fn encode(
        &self,
        _material: Option<&CryptoMaterial>,
        plain: &[u8],
    ) -> Result<Vec<u8>, TransformError> {
        Ok(STANDARD.encode(plain).into_bytes())
    }

    fn decode(
        &self,
        _material: Option<&CryptoMaterial>,
        encoded: &[u8],
    ) -> Result<Vec<u8>, TransformError> {
        STANDARD
            .decode(encoded.trim_ascii())
            .map_err(|e| TransformError::InvalidInput(e.to_string()))
    }
}
