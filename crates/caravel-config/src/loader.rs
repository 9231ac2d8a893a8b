//! Configuration loader with layered sources.

use crate::AppConfig;
use caravel_core::CaravelError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

/// Prefix for environment variable overrides, e.g. `CARAVEL__SERVER__PORT`.
pub const ENV_PREFIX: &str = "CARAVEL";

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides, not committed
    /// 4. Environment variables with `CARAVEL__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CaravelError> {
        let config = Self::load_config(&config_dir.into())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CaravelError> {
        Self::new("./config")
    }

    /// Consumes the loader, returning the loaded configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, CaravelError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("CARAVEL_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_caravel_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), CaravelError> {
    let base_url = config.upstream.base_url.trim();
    if base_url.is_empty() {
        return Err(CaravelError::Configuration("Upstream base URL is required".to_string()));
    }

    let parsed = Url::parse(base_url)
        .map_err(|e| CaravelError::Configuration(format!("Invalid upstream base URL '{}': {}", base_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CaravelError::Configuration(format!(
            "Upstream base URL must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    if config.cache.ttl_secs == 0 {
        return Err(CaravelError::Configuration("Cache TTL must be greater than zero".to_string()));
    }

    if config.redis.enabled {
        if config.redis.address.trim().is_empty() {
            return Err(CaravelError::Configuration("Redis address is required when Redis is enabled".to_string()));
        }
        config.redis.connection_url()?;
    } else {
        warn!("Redis is disabled; every read will go to the upstream");
    }

    if config.server.request_timeout_secs == 0 {
        warn!("Request timeout is zero; requests will run without a deadline");
    }

    Ok(())
}

fn config_error_to_caravel_error(err: ConfigError) -> CaravelError {
    CaravelError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, CaravelError::Configuration(msg) if msg.contains("base URL")));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "ftp://contacts".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = AppConfig::default();
        config.cache.ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_ignores_redis_address_when_disabled() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        config.redis.address = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_requires_redis_address_when_enabled() {
        let mut config = AppConfig::default();
        config.redis.enabled = true;
        config.redis.address = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, CaravelError::Configuration(msg) if msg.contains("Redis address")));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            r#"
[server]
port = 9191

[upstream]
base_url = "http://contacts.internal/v2/contacts"

[redis]
address = "redis.internal:6379"
db = 2

[cache]
ttl_secs = 60
"#,
        );
        write(dir.path(), "local.toml", "[cache]\nttl_secs = 15\n");

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        let config = loader.into_config();

        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.upstream.base_url, "http://contacts.internal/v2/contacts");
        assert_eq!(config.redis.db, 2);
        assert_eq!(config.cache.ttl_secs, 15);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[cache]\nttl_secs = 0\n");

        let result = ConfigLoader::new(dir.path().to_string_lossy());
        assert!(matches!(result, Err(CaravelError::Configuration(_))));
    }
}
