//! Price series points: raw upstream samples and their smoothed form.

use serde::{Deserialize, Serialize};

/// A raw `(timestamp, price)` sample as received from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
}

impl PricePoint {
    #[must_use]
    pub const fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }
}

impl From<(i64, f64)> for PricePoint {
    fn from((timestamp, price): (i64, f64)) -> Self {
        Self::new(timestamp, price)
    }
}

/// A price sample paired with its exponential moving average.
///
/// `ema` is `None` only while a warmup seeding policy is still
/// accumulating samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
    pub ema: Option<f64>,
}

impl TrendPoint {
    /// The trend value, falling back to the raw price when no EMA exists.
    #[must_use]
    pub fn calm_value(&self) -> f64 {
        self.ema.unwrap_or(self.price)
    }
}
