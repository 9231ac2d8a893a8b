//! Custom Axum extractors.

mod request_context;

pub use request_context::*;
