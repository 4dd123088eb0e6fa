//! Transform-aware request pipeline
//!
//! [`TransformExecutor`] wraps a [`RequestExecutor`] with a
//! [`PayloadTransform`]. Per call, a [`TransformPolicy`] decides whether the
//! outgoing body is encoded and whether an undecodable response gets one
//! reverse-transform-and-redecode attempt.

use apireq_core::codec::{Decoder, JsonDecoder};
use apireq_transport::HttpRequest;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};

use crate::error::{RequestError, Result};
use crate::executor::RequestExecutor;
use crate::observability;
use crate::transform::{
    CryptoMaterial, IdentityTransform, MaterialSlot, PayloadTransform, TransformPolicy,
};

/// Request pipeline with a reversible payload transform around it.
///
/// Crypto material is optional executor state: set it with
/// [`set_crypto_material`](Self::set_crypto_material). Each call reads it
/// once, at its start, and hands that same snapshot to both `encode` and
/// `decode`; a concurrent `set` never splits an IV from its key.
///
/// # Example
///
/// ```no_run
/// use apireq::transform::{Base64Transform, TransformPolicy};
/// use apireq::{HttpRequest, RequestExecutor, RequesterConfig, TransformExecutor};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Balance {
///     amount: i64,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let inner = RequestExecutor::from_config(RequesterConfig::default())?;
/// let executor = TransformExecutor::new(inner, Base64Transform);
///
/// let request = HttpRequest::new("POST", "https://api.example.com/balance")
///     .with_text_body(r#"{"account":"a-1"}"#);
/// let balance: Balance = executor
///     .execute_transformed(request, TransformPolicy::both())
///     .await?;
/// # let _ = balance.amount;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TransformExecutor<X = IdentityTransform, D = JsonDecoder> {
    inner: RequestExecutor<D>,
    transform: X,
    material: MaterialSlot,
}

impl<D: Decoder> TransformExecutor<IdentityTransform, D> {
    /// Wrap `inner` with the pass-through transform.
    pub fn passthrough(inner: RequestExecutor<D>) -> Self {
        Self::new(inner, IdentityTransform)
    }
}

impl<X: PayloadTransform, D: Decoder> TransformExecutor<X, D> {
    /// Wrap `inner` with `transform`. No crypto material is set.
    pub fn new(inner: RequestExecutor<D>, transform: X) -> Self {
        Self {
            inner,
            transform,
            material: MaterialSlot::default(),
        }
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &RequestExecutor<D> {
        &self.inner
    }

    /// The payload transform.
    pub fn transform(&self) -> &X {
        &self.transform
    }

    /// Replace the crypto material. IV and key are swapped in together.
    pub fn set_crypto_material(&self, iv: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) {
        self.material.replace(Some(CryptoMaterial::new(iv, key)));
        debug!(label = %self.inner.profile().log_label(), "Crypto material updated");
    }

    /// Remove the crypto material. Transforms then receive `None`.
    pub fn clear_crypto_material(&self) {
        self.material.replace(None);
        debug!(label = %self.inner.profile().log_label(), "Crypto material cleared");
    }

    /// The current crypto material, if set.
    pub fn crypto_material(&self) -> Option<Arc<CryptoMaterial>> {
        self.material.snapshot()
    }

    /// Perform `request` under `policy`.
    ///
    /// 1. With `transform_outgoing`, the body is required and replaced by its
    ///    encoding; a missing or empty body fails with
    ///    [`RequestError::BodyMissing`] before anything is sent.
    /// 2. The request goes through the inner executor.
    /// 3. With `transform_incoming`, a [`RequestError::DecodeFailed`] is
    ///    recovered once: the raw body is reverse-transformed and decoded
    ///    again. Every other outcome is returned unchanged.
    ///
    /// # Errors
    ///
    /// Everything [`RequestExecutor::execute`] returns, plus:
    /// - [`RequestError::BodyMissing`] as described above
    /// - [`RequestError::TransformFailed`] if encoding the body or reversing
    ///   the response fails
    /// - [`RequestError::DecodeFailed`] carrying the reverse-transformed bytes
    ///   if the second decode also fails
    pub async fn execute_transformed<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        policy: TransformPolicy,
    ) -> Result<T> {
        let label = self.inner.profile().log_label();
        let span = observability::transform_span(label, policy);

        async move {
            let result = self.run(request, policy).await;
            observability::log_outcome(&result);
            result
        }
        .instrument(span)
        .await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
        policy: TransformPolicy,
    ) -> Result<T> {
        let material = self.material.snapshot();

        if policy.transform_outgoing {
            let Some(plain) = request.non_empty_body() else {
                warn!("Outgoing transform requested without a request body");
                return Err(RequestError::BodyMissing);
            };
            let encoded = self
                .transform
                .encode(material.as_deref(), plain)
                .map_err(|err| {
                    warn!(error = %err, "Failed to encode request body");
                    RequestError::TransformFailed(err)
                })?;
            debug!(
                plain_size = plain.len(),
                encoded_size = encoded.len(),
                "Request body encoded"
            );
            request.body = Some(encoded);
        }

        let span = observability::request_span(self.inner.profile().log_label(), &request);
        match self.inner.run::<T>(request).instrument(span).await {
            Err(RequestError::DecodeFailed { body, source }) if policy.transform_incoming => {
                debug!(error = %source, "Retrying decode on reverse-transformed body");
                self.redecode(body, material.as_deref())
            }
            other => other,
        }
    }

    /// The single recovery attempt: reverse the transform, decode once more.
    fn redecode<T: DeserializeOwned>(
        &self,
        raw: Vec<u8>,
        material: Option<&CryptoMaterial>,
    ) -> Result<T> {
        let reversed = self.transform.decode(material, &raw).map_err(|err| {
            warn!(error = %err, body_size = raw.len(), "Failed to reverse-transform response body");
            RequestError::TransformFailed(err)
        })?;

        self.inner.decode(reversed)
    }
}
