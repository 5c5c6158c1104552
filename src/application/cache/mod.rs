//! Time-bounded cache over a [`CacheMedium`].
//!
//! Values are stored as a JSON envelope `{"data": ..., "timestamp": <ms>}`.
//! An entry older than the freshness window is never returned and is
//! removed on the read that finds it stale. Nothing sweeps proactively.
//!
//! The cache is best-effort: medium errors and undecodable payloads are
//! treated as misses on read and logged-and-dropped on write.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::port::outbound::cache::CacheMedium;

/// Default freshness window in seconds: 6 hours.
pub const DEFAULT_FRESHNESS_SECS: i64 = 6 * 60 * 60;

/// Default freshness window: 6 hours.
#[must_use]
pub fn default_freshness() -> Duration {
    Duration::seconds(DEFAULT_FRESHNESS_SECS)
}

/// Stored envelope.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    /// Epoch milliseconds at write time.
    timestamp: i64,
}

/// Borrowing twin of [`CacheEntry`] for writes.
#[derive(Serialize)]
struct CacheEntryRef<'a, T> {
    data: &'a T,
    timestamp: i64,
}

/// Envelope header only, for listing entries without knowing `T`.
#[derive(Deserialize)]
struct EntryHeader {
    timestamp: i64,
}

/// Summary of one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub key: String,
    /// `None` when the payload is not a readable envelope.
    pub stored_at: Option<DateTime<Utc>>,
    pub fresh: bool,
}

/// Keyed cache with a single freshness window shared by all keys.
#[derive(Clone)]
pub struct TimedCache {
    medium: Arc<dyn CacheMedium>,
    freshness: Duration,
}

impl TimedCache {
    /// Create a cache over `medium` with the given freshness window.
    pub fn new(medium: Arc<dyn CacheMedium>, freshness: Duration) -> Self {
        Self { medium, freshness }
    }

    #[must_use]
    pub const fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Name of the underlying medium.
    #[must_use]
    pub fn medium_name(&self) -> &'static str {
        self.medium.name()
    }

    /// Return the value under `key` if it is still fresh.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// [`get`](Self::get) evaluated at an explicit instant.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let payload = match self.medium.read(key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, medium = self.medium.name(), error = %e, "Cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&payload) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "Undecodable cache entry, treating as miss");
                return None;
            }
        };

        if !self.is_fresh(entry.timestamp, now) {
            debug!(key, "Cache entry expired, evicting");
            if let Err(e) = self.medium.remove(key) {
                warn!(key, error = %e, "Failed to evict expired cache entry");
            }
            return None;
        }

        Some(entry.data)
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        self.put_at(key, value, Utc::now());
    }

    /// [`put`](Self::put) stamped with an explicit instant.
    pub fn put_at<T: Serialize>(&self, key: &str, value: &T, now: DateTime<Utc>) {
        let entry = CacheEntryRef {
            data: value,
            timestamp: now.timestamp_millis(),
        };

        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };

        match self.medium.write(key, &payload) {
            Ok(()) => debug!(key, bytes = payload.len(), "Cache entry stored"),
            Err(e) => warn!(key, medium = self.medium.name(), error = %e, "Failed to save to cache"),
        }
    }

    /// Describe every stored entry, fresh or not, without evicting.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot list its keys.
    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        let now = Utc::now();
        let mut entries = Vec::new();

        for key in self.medium.keys()? {
            let stored_ms = self
                .medium
                .read(&key)?
                .and_then(|payload| serde_json::from_str::<EntryHeader>(&payload).ok())
                .map(|header| header.timestamp);

            entries.push(EntryInfo {
                stored_at: stored_ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
                fresh: stored_ms.is_some_and(|ms| self.is_fresh(ms, now)),
                key,
            });
        }

        Ok(entries)
    }

    /// Remove every entry. Returns the count removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails.
    pub fn clear(&self) -> Result<usize> {
        self.medium.clear()
    }

    fn is_fresh(&self, stored_ms: i64, now: DateTime<Utc>) -> bool {
        now.timestamp_millis().saturating_sub(stored_ms) <= self.freshness.num_milliseconds()
    }
}

impl std::fmt::Debug for TimedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("medium", &self.medium.name())
            .field("freshness", &self.freshness)
            .finish()
    }
}
