//! API response types.

mod sink;

pub use sink::*;

use caravel_core::{CaravelError, ErrorResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError {
    pub error: CaravelError,
    pub trace_id: Option<String>,
}

impl AppError {
    /// Attaches the request id reported back to the caller.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<CaravelError> for AppError {
    fn from(error: CaravelError) -> Self {
        Self {
            error,
            trace_id: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = ErrorResponse::from_error(&self.error);
        if let Some(trace_id) = self.trace_id {
            body = body.with_trace_id(trace_id);
        }

        (status, Json(body)).into_response()
    }
}
