//! Request-scoped context passed explicitly through the data layer.

use crate::{CaravelError, CaravelResult};
use http::HeaderMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Per-request state: identity, forwarded headers, deadline and log span.
///
/// Every data-layer call takes a `&RequestContext`. Warnings raised on behalf
/// of a request are logged with [`RequestContext::span`] as their parent so
/// they carry the request id.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    headers: HeaderMap,
    deadline: Option<Instant>,
    span: Span,
}

impl RequestContext {
    /// Creates a context for the given request id with no headers and no deadline.
    pub fn new(request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        let span = info_span!("request", request_id = %request_id);
        Self {
            request_id,
            headers: HeaderMap::new(),
            deadline: None,
            span,
        }
    }

    /// Creates a context with a freshly generated request id.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Sets the headers forwarded to the upstream.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the log span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Time left before the deadline; `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Runs `fut`, failing with [`CaravelError::Timeout`] if the deadline
    /// passes first.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> CaravelResult<T>
    where
        F: Future<Output = CaravelResult<T>>,
    {
        match self.remaining() {
            None => fut.await,
            Some(left) if left.is_zero() => Err(CaravelError::Timeout(format!(
                "{} skipped: request deadline already passed",
                operation
            ))),
            Some(left) => tokio::time::timeout(left, fut)
                .await
                .map_err(|_| CaravelError::Timeout(format!("{} exceeded request deadline", operation)))?,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::generate()
    }
}
