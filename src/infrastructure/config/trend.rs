//! Trend transform configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{SeedPolicy, TrendSmoother, DEFAULT_TREND_PERIOD};

/// EMA horizon and seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Horizon `N` in samples; `k = 2 / (N + 1)`.
    #[serde(default = "default_period")]
    pub period: usize,
    #[serde(default)]
    pub seed: SeedPolicy,
}

const fn default_period() -> usize {
    DEFAULT_TREND_PERIOD
}

impl TrendConfig {
    #[must_use]
    pub fn smoother(&self) -> TrendSmoother {
        TrendSmoother::new(self.period, self.seed)
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            seed: SeedPolicy::default(),
        }
    }
}
