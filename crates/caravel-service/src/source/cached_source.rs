//! Cache-aside decorator over a [`DataSource`].

use crate::cache::CacheStore;
use crate::DataSource;
use async_trait::async_trait;
use bytes::Bytes;
use caravel_core::{BoxResponse, CaravelResult, RequestContext};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves reads from the cache when it can and invalidates on writes.
///
/// Cache failures are logged against the request span and never reach the
/// caller. Origin failures are returned untouched.
pub struct CachedDataSource {
    origin: Arc<dyn DataSource>,
    cache: Arc<dyn CacheStore>,
}

impl CachedDataSource {
    /// Wraps `origin` with `cache`.
    pub fn new(origin: Arc<dyn DataSource>, cache: Arc<dyn CacheStore>) -> Self {
        Self { origin, cache }
    }

    async fn invalidate(&self, ctx: &RequestContext, response: &BoxResponse) {
        if let Err(e) = self.cache.remove(ctx, response.as_ref()).await {
            warn!(parent: ctx.span(), error = %e, "Failed to remove contact from cache");
        }
    }
}

#[async_trait]
impl DataSource for CachedDataSource {
    async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<BoxResponse> {
        match self.cache.get(ctx, key).await {
            Ok(Some(cached)) => {
                debug!(parent: ctx.span(), key = %key, "Serving contact from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(parent: ctx.span(), key = %key, error = %e, "Failed to read contact from cache");
            }
        }

        let response = self.origin.get(ctx, key).await?;

        if let Err(e) = self.cache.insert(ctx, response.as_ref()).await {
            warn!(parent: ctx.span(), key = %key, error = %e, "Failed to cache contact");
        }

        Ok(response)
    }

    async fn create(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
        let response = self.origin.create(ctx, body).await?;
        self.invalidate(ctx, &response).await;
        Ok(response)
    }

    async fn update(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
        let response = self.origin.update(ctx, body).await?;
        self.invalidate(ctx, &response).await;
        Ok(response)
    }
}
