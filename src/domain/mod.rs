//! Upstream-agnostic domain types and the trend transform.
//!
//! Nothing here performs I/O.

pub mod coin;
pub mod id;
pub mod series;
pub mod trend;

pub use coin::CoinSummary;
pub use id::{CoinId, TaskId};
pub use series::{PricePoint, TrendPoint};
pub use trend::{calm_price, smooth, Ema, SeedPolicy, TrendSmoother, DEFAULT_TREND_PERIOD};
