//! Request context extractor.

use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName},
};
use caravel_core::RequestContext;
use std::convert::Infallible;
use tracing::info_span;
use uuid::Uuid;

/// Header carrying the caller's request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Extractor that builds the [`RequestContext`] for a contact call.
///
/// The request id comes from `x-request-id` when the caller sent a usable
/// one, otherwise a UUID v4 is generated. The inbound headers are kept for
/// forwarding and the configured request timeout becomes the deadline.
pub struct Context(pub RequestContext);

impl std::ops::Deref for Context {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Returns the caller-supplied request id, if it is printable and non-empty.
pub fn request_id_from(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Context {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let request_id = request_id_from(parts).unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %parts.method,
            path = %parts.uri.path(),
        );

        let mut ctx = RequestContext::new(request_id)
            .with_span(span)
            .with_headers(parts.headers.clone());

        if let Some(timeout) = state.request_timeout {
            ctx = ctx.with_timeout(timeout);
        }

        Ok(Context(ctx))
    }
}
