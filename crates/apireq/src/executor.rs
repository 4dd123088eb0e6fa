//! The base request pipeline
//!
//! [`RequestExecutor`] performs one request and turns its outcome into either
//! a decoded value or a classified [`RequestError`]:
//!
//! 1. merge the profile's headers into the request (profile wins),
//! 2. dispatch through the transport,
//! 3. accept only status 200,
//! 4. decode the body into the requested type.
//!
//! There are no retries at this layer.

use apireq_core::codec::{Decoder, JsonDecoder};
use apireq_transport::{HttpRequest, HttpResponse, HttpTransport, Transport, TransportError};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::{RequestProfile, RequesterConfig};
use crate::error::{ConfigError, RequestError, Result};
use crate::observability::{self, RequestMetadata, RequestTimer, ResponseMetadata};

/// The only status code the pipeline accepts.
pub const SUCCESS_STATUS: u16 = 200;

/// Single-shot typed request pipeline.
///
/// The transport call is dispatched onto the tokio runtime as its own task,
/// and the result is classified and decoded on the task that awaits
/// [`execute`](Self::execute). Callers therefore always observe completion
/// from their own task, whichever worker thread finished the I/O.
///
/// Must be polled from within a tokio runtime; otherwise every call fails
/// with [`RequestError::TransportFailed`].
///
/// # Example
///
/// ```no_run
/// use apireq::{HttpRequest, RequestExecutor, RequesterConfig};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Status {
///     healthy: bool,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = RequestExecutor::from_config(RequesterConfig::default())?;
/// let status: Status = executor
///     .execute(HttpRequest::new("GET", "https://api.example.com/status"))
///     .await?;
/// assert!(status.healthy);
/// # Ok(())
/// # }
/// ```
pub struct RequestExecutor<D = JsonDecoder> {
    transport: Arc<dyn Transport>,
    profile: Arc<dyn RequestProfile>,
    decoder: D,
}

impl<D> fmt::Debug for RequestExecutor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("transport", &self.transport.name())
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor<JsonDecoder> {
    /// Create an executor over `transport` with the JSON decoder.
    pub fn new<T, P>(transport: T, profile: P) -> Self
    where
        T: Transport + 'static,
        P: RequestProfile + 'static,
    {
        Self {
            transport: Arc::new(transport),
            profile: Arc::new(profile),
            decoder: JsonDecoder,
        }
    }

    /// Create an executor with an [`HttpTransport`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: RequesterConfig) -> std::result::Result<Self, ConfigError> {
        Self::builder().config(config).build()
    }

    /// Create a builder.
    pub fn builder() -> RequestExecutorBuilder<JsonDecoder> {
        RequestExecutorBuilder::default()
    }
}

impl<D: Decoder> RequestExecutor<D> {
    /// Replace the decoder.
    pub fn with_decoder<D2: Decoder>(self, decoder: D2) -> RequestExecutor<D2> {
        RequestExecutor {
            transport: self.transport,
            profile: self.profile,
            decoder,
        }
    }

    /// The profile supplying label and headers.
    pub fn profile(&self) -> &dyn RequestProfile {
        self.profile.as_ref()
    }

    /// Perform `request` and decode a 200 response body into `T`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::TransportFailed`] if no response was obtained
    ///   (network, timeout, cancellation)
    /// - [`RequestError::StatusNotOk`] if the status is not 200 or missing;
    ///   the body is not decoded
    /// - [`RequestError::DecodeFailed`] with the raw body if decoding fails
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let span = observability::request_span(self.profile.log_label(), &request);

        async move {
            let result = self.run(request).await;
            observability::log_outcome(&result);
            result
        }
        .instrument(span)
        .await
    }

    /// Fetch and decode without reporting the outcome. Callers that may
    /// still recover from the error report it themselves.
    pub(crate) async fn run<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let body = self.fetch(request).await?;
        self.decode(body)
    }

    /// Decode `body` into `T` with this executor's decoder.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::DecodeFailed`] carrying `body` unchanged.
    pub fn decode<T: DeserializeOwned>(&self, body: Vec<u8>) -> Result<T> {
        self.decoder.decode(&body).map_err(|source| {
            observability::log_decode_error(&source, body.len());
            RequestError::DecodeFailed { body, source }
        })
    }

    /// Steps 1-3 of the pipeline: merge headers, dispatch, check status.
    async fn fetch(&self, mut request: HttpRequest) -> Result<Vec<u8>> {
        let headers = self.profile.headers();
        request.merge_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        RequestMetadata::from_request(self.transport.name(), &request).log_request();
        let timer = RequestTimer::start();

        let response = dispatch(Arc::clone(&self.transport), request)
            .await
            .map_err(|err| {
                observability::log_transport_error(&err, timer.elapsed());
                RequestError::TransportFailed(err)
            })?;

        let meta = ResponseMetadata::new(response.status, response.body.len(), timer.elapsed());
        if response.status != Some(SUCCESS_STATUS) {
            meta.log_rejected();
            return Err(RequestError::StatusNotOk {
                status: response.status,
            });
        }
        meta.log_accepted();

        Ok(response.body)
    }
}

/// Run the transport call on its own task and hand the outcome back.
async fn dispatch(
    transport: Arc<dyn Transport>,
    request: HttpRequest,
) -> apireq_transport::Result<HttpResponse> {
    let runtime = Handle::try_current()
        .map_err(|err| TransportError::Other(format!("no tokio runtime to dispatch on: {}", err)))?;
    let task = runtime.spawn(async move { transport.send_http(request).await }.in_current_span());
    InFlight(task).join().await
}

/// Aborts the dispatched transport task if the caller stops waiting for it.
struct InFlight(JoinHandle<apireq_transport::Result<HttpResponse>>);

impl InFlight {
    async fn join(mut self) -> apireq_transport::Result<HttpResponse> {
        match (&mut self.0).await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(TransportError::Cancelled(err.to_string())),
            Err(err) => Err(TransportError::Other(format!("transport task failed: {}", err))),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Builder for [`RequestExecutor`].
pub struct RequestExecutorBuilder<D = JsonDecoder> {
    transport: Option<Arc<dyn Transport>>,
    profile: Option<Arc<dyn RequestProfile>>,
    config: RequesterConfig,
    decoder: D,
}

impl Default for RequestExecutorBuilder<JsonDecoder> {
    fn default() -> Self {
        Self {
            transport: None,
            profile: None,
            config: RequesterConfig::default(),
            decoder: JsonDecoder,
        }
    }
}

impl<D: Decoder> RequestExecutorBuilder<D> {
    /// Use this transport instead of building an [`HttpTransport`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use a shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom profile instead of the configuration's label and headers.
    pub fn profile(mut self, profile: impl RequestProfile + 'static) -> Self {
        self.profile = Some(Arc::new(profile));
        self
    }

    /// Set the configuration. It is the profile unless [`profile`](Self::profile)
    /// is given, and configures the default transport unless
    /// [`transport`](Self::transport) is given.
    pub fn config(mut self, config: RequesterConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different decoder.
    pub fn decoder<D2: Decoder>(self, decoder: D2) -> RequestExecutorBuilder<D2> {
        RequestExecutorBuilder {
            transport: self.transport,
            profile: self.profile,
            config: self.config,
            decoder,
        }
    }

    /// Build the executor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if no transport was given and the
    /// default HTTP transport cannot be built.
    pub fn build(self) -> std::result::Result<RequestExecutor<D>, ConfigError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_config(self.config.transport.clone())?),
        };
        let profile = match self.profile {
            Some(profile) => profile,
            None => Arc::new(self.config),
        };

        Ok(RequestExecutor {
            transport,
            profile,
            decoder: self.decoder,
        })
    }
}
