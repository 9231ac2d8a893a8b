//! Data-access contract shared by the upstream source and the cache decorator.

use async_trait::async_trait;
use bytes::Bytes;
use caravel_core::{BoxResponse, CaravelResult, RequestContext};

/// Read/write access to contacts.
///
/// `create` and `update` behave the same at this layer apart from the
/// upstream verb; both invalidate the cache when decorated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches the contact identified by `key`.
    async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<BoxResponse>;

    /// Creates a contact from a JSON `body`.
    async fn create(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse>;

    /// Updates a contact from a JSON `body`.
    async fn update(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse>;
}
