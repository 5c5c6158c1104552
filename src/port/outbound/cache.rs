//! Key/value medium port backing the time-bounded cache.

use crate::error::Result;

/// A persistent string key/value medium.
///
/// The medium knows nothing about freshness; expiry lives in
/// [`TimedCache`](crate::application::cache::TimedCache). Errors are
/// reported so the cache can log them, but the cache never propagates them.
pub trait CacheMedium: Send + Sync {
    /// Short name for logging (e.g. `"sqlite"`).
    fn name(&self) -> &'static str;

    /// Read the payload stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `payload` under `key`, replacing any existing value.
    fn write(&self, key: &str, payload: &str) -> Result<()>;

    /// Remove `key`. Returns whether an entry existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every entry. Returns the count removed.
    fn clear(&self) -> Result<usize>;
}
