//! Canonical test configuration.

use crate::infrastructure::config::cache::CacheBackend;
use crate::infrastructure::config::settings::Config;

/// Default configuration with an in-memory cache and the given request
/// spacing.
pub fn memory(min_delay_ms: u64) -> Config {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Memory;
    config.queue.min_delay_ms = min_delay_ms;
    config
}
