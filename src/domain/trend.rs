//! Exponential moving average trend transform.
//!
//! The smoothing constant is `k = 2 / (N + 1)` where `N` is the trend
//! horizon in samples. For `i >= 1` the recurrence is
//! `ema[i] = price[i] * k + ema[i - 1] * (1 - k)`.
//!
//! How `ema[0]` is produced is a [`SeedPolicy`]:
//!
//! - [`SeedPolicy::FirstPrice`] seeds with the first raw price, so every
//!   point carries an EMA. Early output is biased toward the seed and only
//!   converges after several multiples of `N` samples.
//! - [`SeedPolicy::Warmup`] holds the EMA absent until `N` samples have been
//!   seen, then seeds with their simple average.
//!
//! The policy belongs to the smoother, not to a call: pick one per service.

use serde::{Deserialize, Serialize};

use super::series::{PricePoint, TrendPoint};

/// Default trend horizon in samples (daily series: 30 days).
pub const DEFAULT_TREND_PERIOD: usize = 30;

/// How the first EMA value is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// `ema[0] = price[0]`.
    #[default]
    FirstPrice,
    /// No EMA for the first `N - 1` samples; `ema[N - 1]` is the mean of the
    /// first `N` prices.
    Warmup,
}

impl SeedPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPrice => "first_price",
            Self::Warmup => "warmup",
        }
    }
}

/// Incremental EMA state. Feed prices in order with [`Ema::update`].
#[derive(Debug, Clone)]
pub struct Ema {
    k: f64,
    period: usize,
    seed: SeedPolicy,
    count: usize,
    warmup_sum: f64,
    value: Option<f64>,
}

impl Ema {
    /// Create an EMA over `period` samples. A zero period is treated as 1.
    #[must_use]
    pub fn new(period: usize, seed: SeedPolicy) -> Self {
        let period = period.max(1);
        Self {
            k: smoothing_factor(period),
            period,
            seed,
            count: 0,
            warmup_sum: 0.0,
            value: None,
        }
    }

    /// Feed one price and return the EMA after it, if defined yet.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.count += 1;
        let next = match (self.value, self.seed) {
            (Some(prev), _) => Some(price * self.k + prev * (1.0 - self.k)),
            (None, SeedPolicy::FirstPrice) => Some(price),
            (None, SeedPolicy::Warmup) => {
                self.warmup_sum += price;
                (self.count >= self.period).then(|| self.warmup_sum / self.period as f64)
            }
        };
        self.value = next;
        next
    }

    /// The current EMA value, if defined.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Whether at least `period` samples have been consumed.
    #[must_use]
    pub const fn is_warm(&self) -> bool {
        self.count >= self.period
    }
}

/// `k = 2 / (N + 1)`.
#[must_use]
pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Stateless EMA transform configured with a horizon and seed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendSmoother {
    period: usize,
    seed: SeedPolicy,
}

impl TrendSmoother {
    #[must_use]
    pub fn new(period: usize, seed: SeedPolicy) -> Self {
        Self {
            period: period.max(1),
            seed,
        }
    }

    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    #[must_use]
    pub const fn seed(&self) -> SeedPolicy {
        self.seed
    }

    /// Short label identifying this configuration, e.g. `ema30_first_price`.
    ///
    /// Two smoothers with the same tag produce identical output.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("ema{}_{}", self.period, self.seed.as_str())
    }

    /// Smooth `series` into trend points, one-to-one by index.
    #[must_use]
    pub fn smooth(&self, series: &[PricePoint]) -> Vec<TrendPoint> {
        let mut ema = Ema::new(self.period, self.seed);
        series
            .iter()
            .map(|point| TrendPoint {
                timestamp: point.timestamp,
                price: point.price,
                ema: ema.update(point.price),
            })
            .collect()
    }
}

impl Default for TrendSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_PERIOD, SeedPolicy::FirstPrice)
    }
}

/// Smooth with the default 30-sample horizon and first-price seeding.
#[must_use]
pub fn smooth(series: &[PricePoint]) -> Vec<TrendPoint> {
    TrendSmoother::default().smooth(series)
}

/// The "calm" price of a history: the last EMA, or the last raw price when
/// the EMA is not defined yet. `None` for an empty history.
#[must_use]
pub fn calm_price(history: &[TrendPoint]) -> Option<f64> {
    history.last().map(TrendPoint::calm_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(1_700_000_000_000 + i as i64 * 86_400_000, *p))
            .collect()
    }

    #[test]
    fn recurrence_matches_hand_computation() {
        let out = smooth(&series(&[100.0, 130.0]));

        let k = 2.0 / 31.0;
        assert_eq!(out[0].ema, Some(100.0));
        let expected = 130.0 * k + 100.0 * (1.0 - k);
        assert_eq!(out[1].ema, Some(expected));
        assert!((expected - 101.935).abs() < 1e-3);
    }

    #[test]
    fn seed_is_first_price_exactly() {
        let out = smooth(&series(&[42_123.456_789, 1.0, 2.0]));
        assert_eq!(out[0].ema, Some(42_123.456_789));
    }

    #[test]
    fn output_preserves_length_and_order() {
        let input = series(&[5.0, 4.0, 3.0, 7.0, 9.0, 1.0]);
        let out = smooth(&input);

        assert_eq!(out.len(), input.len());
        for (raw, trend) in input.iter().zip(&out) {
            assert_eq!(raw.timestamp, trend.timestamp);
            assert_eq!(raw.price, trend.price);
            assert!(trend.ema.is_some());
        }
    }

    #[test]
    fn smoothing_is_bit_identical_across_calls() {
        let input = series(&[0.1, 0.2, 0.30000000000000004, 1e-9, 12345.678]);
        let a = smooth(&input);
        let b = smooth(&input);

        let bits = |v: &[TrendPoint]| -> Vec<u64> {
            v.iter().map(|p| p.ema.unwrap().to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn empty_series_yields_empty_output() {
        assert!(smooth(&[]).is_empty());
    }

    #[test]
    fn constant_series_stays_constant() {
        let out = smooth(&series(&[50.0; 40]));
        assert!(out.iter().all(|p| p.ema == Some(50.0)));
    }

    #[test]
    fn warmup_holds_ema_until_period_then_seeds_with_mean() {
        let smoother = TrendSmoother::new(3, SeedPolicy::Warmup);
        let out = smoother.smooth(&series(&[1.0, 2.0, 3.0, 5.0]));

        assert_eq!(out[0].ema, None);
        assert_eq!(out[1].ema, None);
        assert_eq!(out[2].ema, Some(2.0));
        // k = 0.5 -> 5 * 0.5 + 2 * 0.5
        assert_eq!(out[3].ema, Some(3.5));
    }

    #[test]
    fn warmup_shorter_than_period_has_no_ema() {
        let smoother = TrendSmoother::new(30, SeedPolicy::Warmup);
        let out = smoother.smooth(&series(&[1.0, 2.0]));
        assert!(out.iter().all(|p| p.ema.is_none()));
    }

    #[test]
    fn incremental_ema_reports_warmth() {
        let mut ema = Ema::new(2, SeedPolicy::FirstPrice);
        assert_eq!(ema.update(10.0), Some(10.0));
        assert!(!ema.is_warm());
        ema.update(13.0);
        assert!(ema.is_warm());
        // k = 2/3
        assert!((ema.value().unwrap() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn tag_distinguishes_period_and_seed() {
        assert_eq!(TrendSmoother::default().tag(), "ema30_first_price");
        assert_eq!(TrendSmoother::new(7, SeedPolicy::Warmup).tag(), "ema7_warmup");
        assert_ne!(
            TrendSmoother::new(30, SeedPolicy::Warmup).tag(),
            TrendSmoother::default().tag()
        );
    }

    #[test]
    fn zero_period_is_clamped() {
        let smoother = TrendSmoother::new(0, SeedPolicy::FirstPrice);
        assert_eq!(smoother.period(), 1);
        // k = 1: EMA tracks price exactly
        let out = smoother.smooth(&series(&[3.0, 8.0]));
        assert_eq!(out[1].ema, Some(8.0));
    }

    #[test]
    fn calm_price_prefers_ema_and_falls_back_to_price() {
        assert_eq!(calm_price(&[]), None);

        let with_ema = [TrendPoint {
            timestamp: 0,
            price: 10.0,
            ema: Some(9.0),
        }];
        assert_eq!(calm_price(&with_ema), Some(9.0));

        let without_ema = [TrendPoint {
            timestamp: 0,
            price: 10.0,
            ema: None,
        }];
        assert_eq!(calm_price(&without_ema), Some(10.0));
    }
}
