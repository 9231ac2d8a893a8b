//! Application configuration structures.

use caravel_core::{CaravelError, CaravelResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Inbound HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream contact API configuration.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache policy configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "caravel".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Per-request deadline in seconds, applied to upstream and cache calls. Zero disables it.
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 10,
            max_body_size: 1024 * 1024, // 1MB
            cors_enabled: false,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-request deadline, or `None` when set to zero.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Returns the shutdown grace period as a Duration.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Upstream contact API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the contact collection, e.g. `http://api:9000/contacts`.
    pub base_url: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum idle pooled connections per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000/contacts".to_string(),
            connect_timeout_secs: 5,
            pool_max_idle_per_host: 32,
        }
    }
}

impl UpstreamConfig {
    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// `host:port` of the Redis server.
    pub address: String,
    /// Logical database index.
    pub db: i64,
    /// Optional password, usually supplied through `CARAVEL__REDIS__PASSWORD`.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Connection pool size.
    pub pool_size: usize,
    /// Enable Redis (when disabled, reads go straight to the upstream).
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6379".to_string(),
            db: 0,
            password: None,
            pool_size: 16,
            enabled: true,
        }
    }
}

impl RedisConfig {
    /// Builds the `redis://` connection URL, with the password percent-encoded.
    pub fn connection_url(&self) -> CaravelResult<String> {
        let mut url = Url::parse(&format!("redis://{}/{}", self.address, self.db))
            .map_err(|e| CaravelError::Configuration(format!("Invalid Redis address '{}': {}", self.address, e)))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password))
                .map_err(|()| CaravelError::Configuration("Redis password cannot be set on this address".to_string()))?;
        }

        Ok(url.to_string())
    }
}

/// Cache policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of every cache entry, fixed at insertion.
    pub ttl_secs: u64,
    /// Prefix prepended to contact ids to form Redis keys.
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300, // 5 minutes
            key_prefix: String::new(),
        }
    }
}

impl CacheConfig {
    /// Returns the entry TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Returns true when logs should be emitted as JSON lines.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
