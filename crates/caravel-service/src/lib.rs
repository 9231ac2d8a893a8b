//! # Caravel Service
//!
//! Caching data-access layer for the Caravel contact proxy.
//!
//! Callers talk to a [`DataSource`]. In production that is a
//! [`CachedDataSource`] wrapping an [`HttpDataSource`] (the upstream contact
//! API) and a [`RedisCacheStore`](cache::RedisCacheStore).

pub mod cache;
pub mod data_source;
pub mod source;

pub use data_source::*;
pub use source::*;
