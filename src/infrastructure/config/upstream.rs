//! Upstream API configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::market::{Endpoints, DEFAULT_BASE_URL};
use crate::error::ConfigError;

/// Where and how to reach the market API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API root, e.g. `https://api.coingecko.com/api/v3`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quote currency for prices.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Size of the coin listing (upstream allows at most 250 per page).
    #[serde(default = "default_top_n")]
    pub top_n: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

const fn default_top_n() -> u32 {
    10
}

const fn default_timeout_secs() -> u64 {
    20
}

impl UpstreamConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build endpoint URLs from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an http(s) URL.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Endpoints::new(&self.base_url, self.vs_currency.clone(), self.top_n)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vs_currency: default_vs_currency(),
            top_n: default_top_n(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
