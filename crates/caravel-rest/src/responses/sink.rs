//! Writes data-layer responses out as Axum responses.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response as AxumResponse,
};
use bytes::BytesMut;
use caravel_core::{headers, CaravelResult, Response, ResponseSink};

/// [`ResponseSink`] that buffers a response into an outbound HTTP response.
///
/// Connection-scoped and framing headers are dropped; the server sets its own.
#[derive(Debug)]
pub struct AxumSink {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
}

impl Default for AxumSink {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
        }
    }
}

impl AxumSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the HTTP response from what was written.
    #[must_use]
    pub fn into_response(self) -> AxumResponse {
        let mut response = AxumResponse::new(Body::from(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for AxumSink {
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn append_header(&mut self, name: &HeaderName, value: &HeaderValue) {
        if !headers::is_non_forwarded(name) {
            self.headers.append(name.clone(), value.clone());
        }
    }

    fn write_body(&mut self, body: &[u8]) -> CaravelResult<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// Writes `response` into a fresh [`AxumSink`].
pub fn render(response: &dyn Response) -> CaravelResult<AxumResponse> {
    let mut sink = AxumSink::new();
    response.write_to(&mut sink)?;
    Ok(sink.into_response())
}
