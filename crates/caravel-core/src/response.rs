//! Write-only response abstraction.
//!
//! A [`Response`] knows how to serialize itself into a [`ResponseSink`] and
//! nothing else. The HTTP layer provides a sink that produces the outbound
//! HTTP response; the cache store uses a [`CaptureSink`] to recover the body
//! bytes it needs for key derivation.

use crate::CaravelResult;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::fmt;

/// Destination a [`Response`] writes itself into.
pub trait ResponseSink: Send {
    /// Sets the status line.
    fn set_status(&mut self, status: StatusCode);

    /// Appends a header, keeping any value already present under `name`.
    fn append_header(&mut self, name: &HeaderName, value: &HeaderValue);

    /// Writes body bytes. Fails if the sink rejects the write.
    fn write_body(&mut self, body: &[u8]) -> CaravelResult<()>;
}

/// A value that can serialize itself into a [`ResponseSink`].
pub trait Response: fmt::Debug + Send + Sync {
    /// Writes headers, status and body into `sink`.
    fn write_to(&self, sink: &mut dyn ResponseSink) -> CaravelResult<()>;
}

/// Owned, type-erased response as handed between components.
pub type BoxResponse = Box<dyn Response>;

/// Response backed by an in-memory status, header map and body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

impl Response for HttpResponse {
    fn write_to(&self, sink: &mut dyn ResponseSink) -> CaravelResult<()> {
        for (name, value) in &self.headers {
            sink.append_header(name, value);
        }
        sink.set_status(self.status);
        sink.write_body(&self.body)
    }
}

/// Sink that records everything written into it.
#[derive(Debug, Default)]
pub struct CaptureSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl CaptureSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written by the response, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes captured so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the sink, returning the captured body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

impl ResponseSink for CaptureSink {
    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn append_header(&mut self, name: &HeaderName, value: &HeaderValue) {
        self.headers.append(name.clone(), value.clone());
    }

    fn write_body(&mut self, body: &[u8]) -> CaravelResult<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}
