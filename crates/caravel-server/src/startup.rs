//! Server startup utilities.

use caravel_config::AppConfig;
use tracing::info;

/// Builds the startup banner lines for `config`.
#[must_use]
pub fn startup_banner(config: &AppConfig) -> Vec<String> {
    let separator = "=".repeat(60);
    let addr = config.server.bind_addr();
    let cache = if config.redis.enabled {
        format!(
            "Cache:     redis://{}/{} (ttl {}s)",
            config.redis.address, config.redis.db, config.cache.ttl_secs
        )
    } else {
        "Cache:     disabled".to_string()
    };

    vec![
        separator.clone(),
        format!("Contacts:  http://{}/v1/contact", addr),
        format!("Upstream:  {}", config.upstream.base_url),
        cache,
        format!("Health:    http://{}/health", addr),
        separator,
    ]
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    for line in startup_banner(config) {
        info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_banner_lists_endpoints_and_cache() {
        let config = AppConfig::default();
        let addr = config.server.bind_addr();
        let banner = startup_banner(&config);

        assert!(banner.contains(&format!("Contacts:  http://{}/v1/contact", addr)));
        assert!(banner.contains(&format!("Health:    http://{}/health", addr)));
        assert!(banner.contains(&format!("Upstream:  {}", config.upstream.base_url)));
        assert!(banner.iter().any(|line| line.starts_with("Cache:     redis://")
            && line.contains(&config.redis.address)
            && line.ends_with(&format!("(ttl {}s)", config.cache.ttl_secs))));
    }

    #[test]
    fn test_startup_banner_without_cache() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;

        let banner = startup_banner(&config);
        assert!(banner.contains(&"Cache:     disabled".to_string()));
        assert!(!banner.iter().any(|line| line.contains("redis://")));
    }
}
