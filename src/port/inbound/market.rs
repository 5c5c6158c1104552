//! Market data use cases exposed to presentation drivers.

use async_trait::async_trait;

use crate::domain::{calm_price, CoinId, CoinSummary, TrendPoint};
use crate::error::FetchError;

/// Read operations over the acquisition pipeline.
///
/// Each call is served from the cache when fresh and otherwise fetched
/// through the rate-limited request queue. Failures are typed; no call
/// retries on its own. Loading states and retry-on-demand belong to the
/// caller.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Top coins by market capitalization.
    async fn coin_list(&self) -> Result<Vec<CoinSummary>, FetchError>;

    /// Daily price history of `coin_id` over `days`, EMA-smoothed.
    async fn coin_history(&self, coin_id: &CoinId, days: u32)
        -> Result<Vec<TrendPoint>, FetchError>;

    /// The calm price of `coin_id`: last EMA of its history.
    async fn calm_price(&self, coin_id: &CoinId, days: u32) -> Result<Option<f64>, FetchError> {
        let history = self.coin_history(coin_id, days).await?;
        Ok(calm_price(&history))
    }
}
