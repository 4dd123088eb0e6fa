//! Transport trait and request/response types
//!
//! Defines the generic Transport trait that can be implemented by different
//! transport mechanisms (reqwest, in-memory fakes, etc.).

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// HTTP request specification
///
/// Represents an HTTP request to be sent via the Transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,

    /// Request URL
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body from string
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into().into_bytes());
        self
    }

    /// Returns the body if one is present and non-empty.
    pub fn non_empty_body(&self) -> Option<&[u8]> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }

    /// Merge `overrides` into the request headers.
    ///
    /// Header names compare case-insensitively. On a collision the override
    /// wins and the request's original spelling of the name is dropped.
    pub fn merge_headers<'a, I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in overrides {
            self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
            self.headers.insert(key.to_string(), value.to_string());
        }
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response
///
/// Represents an HTTP response received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code, `None` when the transport produced a response
    /// without a status line
    pub status: Option<u16>,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status: Some(status),
            headers,
            body,
        }
    }

    /// Create a response with the given status and body and no headers
    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, HashMap::new(), body.into())
    }

    /// Create a response that carries no status code
    pub fn without_status(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: None,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Generic transport trait for different transport mechanisms
///
/// A transport performs exactly one exchange per call. It does not retry and
/// does not interpret status codes; both belong to the layers above.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive a response
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Short name of the transport for diagnostics
    fn name(&self) -> &'static str {
        "custom"
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send_http(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
