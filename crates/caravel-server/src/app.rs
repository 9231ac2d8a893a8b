//! Application wiring: data layer, router and the serve loop.

use axum::Router;
use caravel_config::AppConfig;
use caravel_core::{CaravelError, CaravelResult};
use caravel_rest::{create_router, AppState};
use caravel_service::cache::{RedisBackend, RedisCacheStore};
use caravel_service::{CachedDataSource, DataSource, HttpDataSource};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Builds the data layer described by `config`.
///
/// With Redis enabled the upstream source is wrapped in the cache-aside
/// decorator; the Redis pool must answer `PING` or startup fails.
pub async fn build_data_source(config: &AppConfig) -> CaravelResult<Arc<dyn DataSource>> {
    let origin = Arc::new(HttpDataSource::from_config(&config.upstream)?);
    info!("Upstream contact API: {}", origin.base_url());

    if !config.redis.enabled {
        warn!("Redis disabled, serving contacts straight from the upstream");
        return Ok(origin);
    }

    let backend = Arc::new(RedisBackend::connect(&config.redis).await?);
    let cache = RedisCacheStore::new(backend, config.cache.ttl())
        .with_key_prefix(config.cache.key_prefix.clone());
    info!("Caching contacts for {}s", config.cache.ttl_secs);

    Ok(Arc::new(CachedDataSource::new(origin, Arc::new(cache))))
}

/// Builds the HTTP router over `data_source`.
pub fn build_router(config: &AppConfig, data_source: Arc<dyn DataSource>) -> Router {
    let state = AppState::new(data_source, config.server.request_timeout());
    create_router(state, &config.server)
}

/// Serves `router` until `signal` resolves, then waits at most `grace` for
/// in-flight requests before returning.
pub async fn serve<F>(listener: TcpListener, router: Router, signal: F, grace: Duration) -> CaravelResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let stopping = Arc::new(Notify::new());
    let notifier = stopping.clone();

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            signal.await;
            notifier.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| CaravelError::Internal(format!("REST server error: {}", e)))?;
        }
        () = async {
            stopping.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!("Graceful shutdown exceeded {:?}, dropping in-flight requests", grace);
        }
    }

    Ok(())
}
