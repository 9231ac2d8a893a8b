//! Caching infrastructure for the data-access layer.
//!
//! [`CacheStore`] is the narrow get/insert/remove contract the decorator
//! depends on. [`RedisCacheStore`] implements it over any [`CacheBackend`],
//! deriving keys for insert/remove from the contact id inside the payload.

mod backend;
mod cache_store;
pub mod cache_keys;
mod redis_cache;

pub use backend::{CacheBackend, RedisBackend, Value};
pub use cache_store::CacheStore;
pub use redis_cache::RedisCacheStore;

#[cfg(test)]
pub(crate) use backend::MockCacheBackend;
