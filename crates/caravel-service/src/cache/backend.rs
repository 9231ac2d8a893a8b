//! Key-value backend behind the cache store.

use async_trait::async_trait;
use bytes::Bytes;
use caravel_config::RedisConfig;
use caravel_core::{CaravelError, CaravelResult};
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use std::time::Duration;
use tracing::{debug, info};

pub use deadpool_redis::redis::Value;

/// Minimal key-value operations the cache store needs.
///
/// `get` maps the backend's "not found" reply to `Ok(None)`; every other
/// failure is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Reads the raw value stored under `key`.
    async fn get(&self, key: &str) -> CaravelResult<Option<Value>>;

    /// Writes `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: Bytes, ttl: Duration) -> CaravelResult<()>;

    /// Deletes `key`. Deleting a missing key succeeds.
    async fn del(&self, key: &str) -> CaravelResult<()>;
}

/// Redis-backed [`CacheBackend`] over a deadpool connection pool.
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates a pool from configuration. No connection is opened yet.
    pub fn from_config(config: &RedisConfig) -> CaravelResult<Self> {
        let mut redis_cfg = Config::from_url(config.connection_url()?);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size.max(1)));

        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CaravelError::cache(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Creates the pool and checks the server answers `PING`.
    pub async fn connect(config: &RedisConfig) -> CaravelResult<Self> {
        let backend = Self::from_config(config)?;
        backend.ping().await?;
        info!("Connected to Redis at {} (db {})", config.address, config.db);
        Ok(backend)
    }

    /// Round-trips a `PING`.
    pub async fn ping(&self) -> CaravelResult<()> {
        let mut conn = self.get_conn().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CaravelError::cache(format!("Redis PING failed: {}", e)))?;
        debug!("Redis PING answered '{}'", pong);
        Ok(())
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> CaravelResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CaravelError::cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> CaravelResult<Option<Value>> {
        let mut conn = self.get_conn().await?;
        let value: Value = conn
            .get(key)
            .await
            .map_err(|e| CaravelError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        match value {
            Value::Nil => Ok(None),
            value => Ok(Some(value)),
        }
    }

    async fn set_ex(&self, key: &str, value: Bytes, ttl: Duration) -> CaravelResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value.to_vec(), ttl_secs)
            .await
            .map_err(|e| CaravelError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn del(&self, key: &str) -> CaravelResult<()> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CaravelError::cache(format!("Failed to delete key '{}': {}", key, e)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(())
    }
}
