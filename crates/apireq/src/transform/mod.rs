//! Reversible payload transforms
//!
//! A transform is the pair of operations applied around the request
//! pipeline: `encode` on the outgoing body, `decode` on an incoming body that
//! could not be decoded as-is. Implementations bring their own cipher or
//! armor; the pipeline only cares that bytes go in and bytes (or an error)
//! come out.

mod material;
mod stock;

pub(crate) use material::MaterialSlot;
pub use material::CryptoMaterial;
pub use stock::{Base64Transform, IdentityTransform};

use std::fmt;
use thiserror::Error;

/// Failure of a transform to process a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The input is not something this transform can reverse.
    #[error("invalid encoded payload: {0}")]
    InvalidInput(String),

    /// The transform needs crypto material and none was set.
    #[error("crypto material required but not set")]
    MissingMaterial,

    /// Any other transform-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Capability pair applied around the request pipeline.
///
/// `material` is the executor's crypto material snapshot for the current
/// call, `None` if it was never set. Implementations that do not need it
/// ignore it; implementations that do should return
/// [`TransformError::MissingMaterial`] rather than panic.
///
/// # Example
///
/// ```
/// use apireq::transform::{CryptoMaterial, PayloadTransform, TransformError};
///
/// /// XOR with the first key byte. Not a cipher, just a demonstration.
/// #[derive(Debug)]
/// struct Xor;
///
/// impl PayloadTransform for Xor {
///     fn encode(&self, material: Option<&CryptoMaterial>, plain: &[u8]) -> Result<Vec<u8>, TransformError> {
///         let k = material.and_then(|m| m.key().first().copied()).ok_or(TransformError::MissingMaterial)?;
///         Ok(plain.iter().map(|b| b ^ k).collect())
///     }
///
///     fn decode(&self, material: Option<&CryptoMaterial>, encoded: &[u8]) -> Result<Vec<u8>, TransformError> {
///         self.encode(material, encoded)
///     }
/// }
///
/// let material = CryptoMaterial::new(b"iv".to_vec(), vec![0x2a]);
/// let sealed = Xor.encode(Some(&material), b"hi").unwrap();
/// assert_eq!(Xor.decode(Some(&material), &sealed).unwrap(), b"hi");
/// assert_eq!(Xor.encode(None, b"hi"), Err(TransformError::MissingMaterial));
/// ```
pub trait PayloadTransform: Send + Sync + fmt::Debug {
    /// Transform an outgoing body.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the body cannot be transformed.
    fn encode(
        &self,
        material: Option<&CryptoMaterial>,
        plain: &[u8],
    ) -> Result<Vec<u8>, TransformError>;

    /// Reverse the transform on an incoming body.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the bytes cannot be reversed.
    fn decode(
        &self,
        material: Option<&CryptoMaterial>,
        encoded: &[u8],
    ) -> Result<Vec<u8>, TransformError>;
}

/// Which transforms to apply for a single call.
///
/// The two flags are independent: a call may encode its body without
/// expecting an encoded response, and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TransformPolicy {
    /// Encode the outgoing body before dispatch.
    pub transform_outgoing: bool,

    /// On a decode failure, reverse-transform the body and decode once more.
    pub transform_incoming: bool,
}

impl TransformPolicy {
    /// Create a policy from both flags.
    pub const fn new(transform_outgoing: bool, transform_incoming: bool) -> Self {
        Self {
            transform_outgoing,
            transform_incoming,
        }
    }

    /// Plain request, plain response.
    pub const fn none() -> Self {
        Self::new(false, false)
    }

    /// Encode the outgoing body only.
    pub const fn outgoing() -> Self {
        Self::new(true, false)
    }

    /// Reverse-transform undecodable responses only.
    pub const fn incoming() -> Self {
        Self::new(false, true)
    }

    /// Both directions.
    pub const fn both() -> Self {
        Self::new(true, true)
    }
}
