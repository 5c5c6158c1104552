//! History request defaults.

use serde::{Deserialize, Serialize};

/// Defaults for history requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Look-back window in days when none is given.
    #[serde(default = "default_days")]
    pub default_days: u32,
}

const fn default_days() -> u32 {
    365
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
        }
    }
}
