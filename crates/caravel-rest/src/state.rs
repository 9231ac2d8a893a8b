//! Application state for Axum handlers.

use caravel_service::DataSource;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub data_source: Arc<dyn DataSource>,
    /// Deadline applied to every contact request; `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(data_source: Arc<dyn DataSource>, request_timeout: Option<Duration>) -> Self {
        Self {
            data_source,
            request_timeout,
        }
    }
}
