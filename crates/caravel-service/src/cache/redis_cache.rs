//! Redis-based cache store.

use super::{cache_keys, CacheBackend, CacheStore, Value};
use async_trait::async_trait;
use bytes::Bytes;
use caravel_core::{
    decode_record, encode_response, BoxResponse, CaptureSink, CaravelError, CaravelResult, Contact,
    RequestContext, Response,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache store that keys entries by the contact id found in the payload.
///
/// Reads are by caller-supplied key. Inserts and removals first replay the
/// response into a [`CaptureSink`] and decode the captured body; if that
/// fails the backend is never contacted.
pub struct RedisCacheStore {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    key_prefix: String,
}

impl RedisCacheStore {
    /// Create a new cache store over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            key_prefix: String::new(),
        }
    }

    /// Namespaces every key under `prefix`.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(&self, id: &str) -> String {
        cache_keys::contact_key(&self.key_prefix, id)
    }

    /// Recovers the payload bytes and contact record from `response`.
    fn decode(response: &dyn Response) -> CaravelResult<(Bytes, Contact)> {
        let mut sink = CaptureSink::new();
        response.write_to(&mut sink)?;
        let data = sink.into_body();
        let contact = decode_record(&data)?;
        Ok((data, contact))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<Option<BoxResponse>> {
        let cache_key = self.key(key);
        let value = ctx.run("cache get", self.backend.get(&cache_key)).await?;

        match value {
            None | Some(Value::Nil) => {
                debug!(parent: ctx.span(), key = %cache_key, "Cache miss");
                Ok(None)
            }
            Some(Value::BulkString(data)) => {
                debug!(parent: ctx.span(), key = %cache_key, "Cache hit");
                Ok(Some(encode_response(data)))
            }
            Some(Value::SimpleString(data)) => {
                debug!(parent: ctx.span(), key = %cache_key, "Cache hit");
                Ok(Some(encode_response(data)))
            }
            Some(other) => Err(CaravelError::cache(format!(
                "Cached data for key '{}' is not a string, found {:?}",
                cache_key, other
            ))),
        }
    }

    async fn insert(&self, ctx: &RequestContext, response: &dyn Response) -> CaravelResult<()> {
        let (data, contact) = Self::decode(response)?;
        let cache_key = self.key(&contact.id);
        ctx.run("cache insert", self.backend.set_ex(&cache_key, data, self.ttl))
            .await
    }

    async fn remove(&self, ctx: &RequestContext, response: &dyn Response) -> CaravelResult<()> {
        let (_, contact) = Self::decode(response)?;
        let cache_key = self.key(&contact.id);
        ctx.run("cache remove", self.backend.del(&cache_key)).await
    }
}
