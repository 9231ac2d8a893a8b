//! # Caravel REST
//!
//! REST API layer using Axum for the Caravel contact proxy.
//! Exposes the contact endpoints over a [`DataSource`](caravel_service::DataSource)
//! plus plain health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
