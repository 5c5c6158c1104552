//! Cache configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::cache::DEFAULT_FRESHNESS_SECS;

/// Storage medium behind the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// SQLite file, survives restarts.
    #[default]
    Sqlite,
    /// Process memory only.
    Memory,
}

impl CacheBackend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Cache medium and freshness window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// SQLite database file. A leading `~/` is expanded to the home
    /// directory.
    #[serde(default = "default_path")]
    pub path: String,
    /// Maximum age of a cached value in seconds.
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: i64,
}

fn default_path() -> String {
    "~/.calmprice/cache.db".to_string()
}

const fn default_freshness_secs() -> i64 {
    DEFAULT_FRESHNESS_SECS
}

impl CacheConfig {
    /// Freshness window, saturating at the largest representable duration.
    #[must_use]
    pub fn freshness(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.freshness_secs).unwrap_or(chrono::Duration::MAX)
    }

    /// [`path`](Self::path) with `~/` expanded.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        match (self.path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.path),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: default_path(),
            freshness_secs: default_freshness_secs(),
        }
    }
}
