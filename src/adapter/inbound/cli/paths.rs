//! Path utilities for calmprice.
//!
//! All data lives under `~/.calmprice/`:
//! - `~/.calmprice/config.toml` - main configuration
//! - `~/.calmprice/cache.db` - response cache (default `[cache] path`)

use std::path::PathBuf;

/// Returns the calmprice home directory (`~/.calmprice/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".calmprice")
}

/// Returns the default config file path (`~/.calmprice/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
