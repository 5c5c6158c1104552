//! Composition root: builds the market service from configuration.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::http::HttpFetcher;
use crate::adapter::outbound::memory::MemoryMedium;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteMedium;
use crate::application::cache::TimedCache;
use crate::application::market::MarketService;
use crate::application::queue::RequestQueue;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::cache::CacheBackend;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::cache::CacheMedium;
use crate::port::outbound::fetch::Fetcher;

/// Open the configured cache medium, creating and migrating the SQLite file
/// when needed.
///
/// # Errors
///
/// Returns an error if the database directory or pool cannot be created, or
/// migrations fail.
pub fn build_medium(config: &Config) -> Result<Arc<dyn CacheMedium>> {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryMedium::new())),
        CacheBackend::Sqlite => {
            let path = config.cache.resolved_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let url = path.to_str().ok_or(ConfigError::InvalidValue {
                field: "path",
                reason: "cache path is not valid UTF-8".to_string(),
            })?;
            let pool = create_pool(url)?;
            run_migrations(&pool)?;
            info!(path = %path.display(), "Opened SQLite cache");
            Ok(Arc::new(SqliteMedium::new(pool)))
        }
    }
}

/// Build the time-bounded cache from configuration.
///
/// # Errors
///
/// See [`build_medium`].
pub fn build_cache(config: &Config) -> Result<TimedCache> {
    Ok(TimedCache::new(build_medium(config)?, config.cache.freshness()))
}

/// Build the market service with the real HTTP fetcher.
///
/// # Errors
///
/// Returns an error if the cache or HTTP client cannot be built, or the
/// upstream configuration is invalid.
pub fn build_market_service(config: &Config) -> Result<MarketService> {
    let fetcher = Arc::new(HttpFetcher::new(config.upstream.timeout())?);
    build_market_service_with(config, fetcher)
}

/// Build the market service around a given fetcher.
///
/// # Errors
///
/// Returns an error if the cache cannot be built or the upstream
/// configuration is invalid.
pub fn build_market_service_with(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<MarketService> {
    let endpoints = config.upstream.endpoints()?;
    let cache = build_cache(config)?;
    let queue = RequestQueue::new(config.queue.min_delay());

    info!(
        base_url = %config.upstream.base_url,
        min_delay_ms = config.queue.min_delay_ms,
        cache = cache.medium_name(),
        period = config.trend.period,
        "Market service ready"
    );

    Ok(MarketService::new(
        fetcher,
        queue,
        cache,
        endpoints,
        config.trend.smoother(),
    ))
}
