//! # apireq
//!
//! A typed, asynchronous HTTP request pipeline with a classified error
//! taxonomy and optional reversible payload transforms.
//!
//! - [`RequestExecutor`] issues one request, accepts only status 200, and
//!   decodes the body into the type you ask for.
//! - [`TransformExecutor`] wraps it with a [`PayloadTransform`]: encode the
//!   outgoing body, and reverse-transform a response body that did not decode
//!   as-is, at most once per call.
//!
//! Every call yields exactly one value or one [`RequestError`], telling a
//! transport failure apart from a rejected status apart from a payload that
//! could not be decoded or reversed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apireq::transform::{IdentityTransform, TransformPolicy};
//! use apireq::{HttpRequest, RequestExecutor, RequesterConfig, TransformExecutor};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Profile {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RequesterConfig::builder().log_label("[Profiles]").build();
//!     let executor = TransformExecutor::new(RequestExecutor::from_config(config)?, IdentityTransform);
//!     executor.set_crypto_material(b"0123456789abcdef".to_vec(), b"secret-key".to_vec());
//!
//!     let request = HttpRequest::new("POST", "https://api.example.com/profile")
//!         .with_text_body(r#"{"id":7}"#);
//!     let profile: Profile = executor
//!         .execute_transformed(request, TransformPolicy::both())
//!         .await?;
//!
//!     println!("{}", profile.name);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use config::{RequestProfile, RequesterConfig, RequesterConfigBuilder};
pub use error::{ConfigError, ErrorKind, RequestError, Result};
pub use executor::{RequestExecutor, RequestExecutorBuilder, SUCCESS_STATUS};
pub use transform::{CryptoMaterial, PayloadTransform, TransformPolicy};
pub use transformed::TransformExecutor;

pub use apireq_core::codec::{DecodeError, Decoder, JsonDecoder};
pub use apireq_transport::{
    HttpRequest, HttpResponse, HttpTransport, HttpTransportConfig, Transport, TransportError,
};

// Module declarations
pub mod config;
pub mod error;
pub mod executor;
pub mod observability;
pub mod transform;
pub mod transformed;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::transform::{Base64Transform, IdentityTransform};
    pub use crate::{
        HttpRequest, RequestError, RequestExecutor, RequestProfile, RequesterConfig,
        TransformExecutor, TransformPolicy,
    };
}
