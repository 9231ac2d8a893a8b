//! Cache store contract used by the cache-aside decorator.

use async_trait::async_trait;
use caravel_core::{BoxResponse, CaravelResult, RequestContext, Response};

/// Response cache keyed by contact id.
///
/// Only `get` takes a key; `insert` and `remove` find the key inside the
/// response itself.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached response for `key`, or `None` on a miss.
    async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<Option<BoxResponse>>;

    /// Stores `response` under the id it carries, overwriting any entry.
    async fn insert(&self, ctx: &RequestContext, response: &dyn Response) -> CaravelResult<()>;

    /// Drops the entry for the id `response` carries. Absence is not an error.
    async fn remove(&self, ctx: &RequestContext, response: &dyn Response) -> CaravelResult<()>;
}
