//! Request queue configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Spacing of upstream requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Minimum time between the starts of two upstream requests.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
}

const fn default_min_delay_ms() -> u64 {
    1200
}

impl QueueConfig {
    #[must_use]
    pub const fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
        }
    }
}
