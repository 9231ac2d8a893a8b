//! Unified error types for all layers of the proxy.

use crate::BoxResponse;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Caravel.
///
/// Variants are grouped by where they originate: the upstream contact API,
/// the cache backend, the payload codec, and the runtime.
#[derive(Error, Debug)]
pub enum CaravelError {
    // ============ Upstream Errors ============
    /// Transport-level failure talking to the upstream API.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The upstream answered with a status other than 200.
    ///
    /// The converted upstream response is kept so the caller can still
    /// forward it.
    #[error("Upstream response status code is not 200, code - {code}, status - '{reason}'")]
    UpstreamStatus {
        code: u16,
        reason: String,
        response: Option<BoxResponse>,
    },

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Cache Errors ============
    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Codec Errors ============
    /// Payload could not be decoded into a contact record.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A response sink rejected a write.
    #[error("Response write error: {0}")]
    Sink(String),

    // ============ Runtime Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaravelError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Upstream(_) | Self::UpstreamStatus { .. } => 502,
            Self::Timeout(_) => 504,
            Self::Cache(_)
            | Self::Decode(_)
            | Self::Sink(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::UpstreamStatus { .. } => "UPSTREAM_STATUS",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Sink(_) => "RESPONSE_WRITE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates an upstream transport error.
    #[must_use]
    pub fn upstream<T: Into<String>>(message: T) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode<T: Into<String>>(message: T) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the upstream response attached to this error, if any.
    #[must_use]
    pub fn upstream_response(&self) -> Option<&BoxResponse> {
        match self {
            Self::UpstreamStatus { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Takes the upstream response out of this error, leaving `None` behind.
    pub fn take_upstream_response(&mut self) -> Option<BoxResponse> {
        match self {
            Self::UpstreamStatus { response, .. } => response.take(),
            _ => None,
        }
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Cache(_) | Self::Timeout(_))
    }
}

impl From<serde_json::Error> for CaravelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from a `CaravelError`.
    #[must_use]
    pub fn from_error(error: &CaravelError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<&CaravelError> for ErrorResponse {
    fn from(error: &CaravelError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_ok;

    fn status_error(code: u16, with_response: bool) -> CaravelError {
        CaravelError::UpstreamStatus {
            code,
            reason: "Internal Server Error".to_string(),
            response: with_response.then(|| Box::new(json_ok("{}")) as BoxResponse),
        }
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CaravelError::Sink("closed".to_string()).status_code(), 500);
        assert_eq!(CaravelError::upstream("connection refused").status_code(), 502);
        assert_eq!(status_error(500, false).status_code(), 502);
        assert_eq!(CaravelError::Timeout("redis".to_string()).status_code(), 504);
        assert_eq!(CaravelError::cache("down").status_code(), 500);
        assert_eq!(CaravelError::decode("bad json").status_code(), 500);
        assert_eq!(CaravelError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CaravelError::upstream("x").error_code(), "UPSTREAM_ERROR");
        assert_eq!(status_error(404, false).error_code(), "UPSTREAM_STATUS");
        assert_eq!(CaravelError::cache("x").error_code(), "CACHE_ERROR");
        assert_eq!(CaravelError::decode("x").error_code(), "DECODE_ERROR");
        assert_eq!(CaravelError::Sink("x".to_string()).error_code(), "RESPONSE_WRITE_ERROR");
        assert_eq!(CaravelError::Configuration("x".to_string()).error_code(), "CONFIGURATION_ERROR");
        assert_eq!(CaravelError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_upstream_status_message_mentions_code() {
        let err = status_error(500, true);
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
    }

    #[test]
    fn test_take_upstream_response() {
        let mut err = status_error(500, true);
        assert!(err.upstream_response().is_some());

        let taken = err.take_upstream_response();
        assert!(taken.is_some());
        assert!(err.upstream_response().is_none());
        assert!(err.take_upstream_response().is_none());
    }

    #[test]
    fn test_non_status_errors_carry_no_response() {
        let mut err = CaravelError::upstream("reset by peer");
        assert!(err.upstream_response().is_none());
        assert!(err.take_upstream_response().is_none());
    }

    #[test]
    fn test_retriable_errors() {
        assert!(CaravelError::upstream("reset").is_retriable());
        assert!(CaravelError::cache("down").is_retriable());
        assert!(CaravelError::Timeout("slow".to_string()).is_retriable());
        assert!(!CaravelError::decode("bad").is_retriable());
        assert!(!status_error(500, false).is_retriable());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: CaravelError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CaravelError::Decode(_)));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = CaravelError::upstream("connection refused");
        let response = ErrorResponse::from_error(&err).with_trace_id("req-1");
        assert_eq!(response.code, "UPSTREAM_ERROR");
        assert!(response.message.contains("connection refused"));
        assert_eq!(response.trace_id, Some("req-1".to_string()));
    }
}
