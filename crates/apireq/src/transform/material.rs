use secrecy::{ExposeSecret, SecretBox};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Initialization vector and key handed to transforms.
///
/// The key is kept in a [`SecretBox`]: it never appears in `Debug` output
/// and is zeroized when the material is dropped.
pub struct CryptoMaterial {
    iv: Vec<u8>,
    key: SecretBox<Vec<u8>>,
}

impl CryptoMaterial {
    /// Create material from an IV and a key.
    pub fn new(iv: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            iv: iv.into(),
            key: SecretBox::new(Box::new(key.into())),
        }
    }

    /// The initialization vector.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// The key bytes.
    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }
}

impl fmt::Debug for CryptoMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoMaterial")
            .field("iv_len", &self.iv.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Holder for the executor's current material.
///
/// Writers swap in a whole new `Arc`; readers clone the `Arc`. A reader
/// therefore always sees an IV and key that were set together.
#[derive(Debug, Default)]
pub(crate) struct MaterialSlot {
    current: RwLock<Option<Arc<CryptoMaterial>>>,
}

impl MaterialSlot {
    pub(crate) fn replace(&self, material: Option<CryptoMaterial>) {
        let next = material.map(Arc::new);
        // The guarded value is only ever replaced whole, so a poisoned lock still holds a consistent pair.
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub(crate) fn snapshot(&self) -> Option<Arc<CryptoMaterial>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
