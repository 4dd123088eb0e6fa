//! Common test utilities and helpers

#![allow(dead_code)]

use apireq::transform::{CryptoMaterial, PayloadTransform, TransformError};
use apireq::{DecodeError, Decoder, HttpRequest, HttpResponse, JsonDecoder, Transport, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// The `{x:int}` shape used throughout the scenarios.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Point {
    pub x: i64,
}

/// Install a test-writer subscriber once so log statements are exercised.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("apireq=debug")
        .with_test_writer()
        .try_init();
}

/// In-memory log sink for asserting on formatted `tracing` output.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route events on the current thread into this capture until the guard drops.
    pub fn install(&self, filter: &str) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A mock transport that records every request and replays queued outcomes.
///
/// When the queue is empty it answers `200` with an empty JSON object.
#[derive(Clone, Default)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<HttpRequest>>>,
    queued: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.queue(Ok(HttpResponse::with_status(status, body)));
        self
    }

    /// Queue a response that has no status code.
    pub fn respond_without_status(self, body: impl Into<Vec<u8>>) -> Self {
        self.queue(Ok(HttpResponse::without_status(body)));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.queue(Err(error));
        self
    }

    fn queue(&self, outcome: Result<HttpResponse, TransportError>) {
        self.queued.lock().unwrap().push_back(outcome);
    }

    /// Requests seen so far, in order.
    pub fn sent_requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of calls made through this transport.
    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(200, "{}")))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// JSON decoder that counts how many times it was asked to decode.
#[derive(Clone, Default)]
pub struct CountingDecoder {
    calls: Arc<AtomicUsize>,
}

impl CountingDecoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Decoder for CountingDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        JsonDecoder.decode(bytes)
    }
}

/// What `RecordingTransform::decode` does with its input.
#[derive(Debug, Clone)]
pub enum Reverse {
    /// Return these bytes regardless of input
    To(Vec<u8>),
    /// Fail with `TransformError::InvalidInput`
    Fail,
}

/// Transform that records its inputs and the material it was handed.
///
/// `encode` prefixes the body with `enc:`.
#[derive(Debug, Clone)]
pub struct RecordingTransform {
    reverse: Reverse,
    encoded: Arc<Mutex<Vec<Vec<u8>>>>,
    decoded: Arc<Mutex<Vec<Vec<u8>>>>,
    materials: Arc<Mutex<Vec<Option<(Vec<u8>, Vec<u8>)>>>>,
}

impl RecordingTransform {
    pub fn new(reverse: Reverse) -> Self {
        Self {
            reverse,
            encoded: Arc::default(),
            decoded: Arc::default(),
            materials: Arc::default(),
        }
    }

    pub fn reversing_to(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Reverse::To(bytes.into()))
    }

    pub fn failing() -> Self {
        Self::new(Reverse::Fail)
    }

    /// Inputs `encode` was called with.
    pub fn encode_inputs(&self) -> Vec<Vec<u8>> {
        self.encoded.lock().unwrap().clone()
    }

    /// Inputs `decode` was called with.
    pub fn decode_inputs(&self) -> Vec<Vec<u8>> {
        self.decoded.lock().unwrap().clone()
    }

    /// `(iv, key)` seen by each transform call, `None` where no material was set.
    pub fn materials_seen(&self) -> Vec<Option<(Vec<u8>, Vec<u8>)>> {
        self.materials.lock().unwrap().clone()
    }

    fn record_material(&self, material: Option<&CryptoMaterial>) {
        self.materials
            .lock()
            .unwrap()
            .push(material.map(|m| (m.iv().to_vec(), m.key().to_vec())));
    }
}

impl PayloadTransform for RecordingTransform {
    fn encode(&self, material: Option<&CryptoMaterial>, plain: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.record_material(material);
        self.encoded.lock().unwrap().push(plain.to_vec());
        Ok([b"enc:".as_slice(), plain].concat())
    }

    fn decode(&self, material: Option<&CryptoMaterial>, encoded: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.record_material(material);
        self.decoded.lock().unwrap().push(encoded.to_vec());
        match &self.reverse {
            Reverse::To(bytes) => Ok(bytes.clone()),
            Reverse::Fail => Err(TransformError::InvalidInput("cannot reverse".into())),
        }
    }
}
