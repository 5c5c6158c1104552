//! Market data service: cache, queue and trend transform composed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::upstream::{self, Endpoints};
use crate::application::cache::TimedCache;
use crate::application::queue::RequestQueue;
use crate::domain::{CoinId, CoinSummary, TrendPoint, TrendSmoother};
use crate::error::FetchError;
use crate::port::inbound::market::MarketData;
use crate::port::outbound::fetch::Fetcher;

/// Cache key of the coin listing.
pub const COIN_LIST_KEY: &str = "coins_list";

/// Cache key of one coin's history over `days`, as smoothed by `smoother`.
///
/// The smoother's tag is part of the key, so a changed period or seed policy
/// never reads trend points produced under the old one.
#[must_use]
pub fn history_key(coin_id: &CoinId, days: u32, smoother: &TrendSmoother) -> String {
    format!("history_{coin_id}_{days}_{}", smoother.tag())
}

/// Serves [`MarketData`] from a [`TimedCache`] in front of a rate-limited
/// [`RequestQueue`].
///
/// Every upstream call, listing or history, goes through the same queue.
/// Nothing is written to the cache unless the fetch, the parse and the
/// transform all succeed.
#[derive(Clone)]
pub struct MarketService {
    fetcher: Arc<dyn Fetcher>,
    queue: RequestQueue<Vec<u8>>,
    cache: TimedCache,
    endpoints: Endpoints,
    smoother: TrendSmoother,
}

impl MarketService {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        queue: RequestQueue<Vec<u8>>,
        cache: TimedCache,
        endpoints: Endpoints,
        smoother: TrendSmoother,
    ) -> Self {
        Self {
            fetcher,
            queue,
            cache,
            endpoints,
            smoother,
        }
    }

    #[must_use]
    pub const fn queue(&self) -> &RequestQueue<Vec<u8>> {
        &self.queue
    }

    #[must_use]
    pub const fn cache(&self) -> &TimedCache {
        &self.cache
    }

    #[must_use]
    pub const fn smoother(&self) -> &TrendSmoother {
        &self.smoother
    }

    /// Fetch `url` through the queue and wait for its turn.
    async fn fetch_queued(&self, url: String) -> Result<Vec<u8>, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        let pending = self.queue.pending();
        if pending > 0 {
            debug!(url = %url, ahead = pending, "Waiting for queued requests");
        }
        self.queue
            .submit(move || async move { fetcher.fetch(&url).await })
            .await
    }

    async fn fetch_coin_list(&self) -> Result<Vec<CoinSummary>, FetchError> {
        let body = self.fetch_queued(self.endpoints.markets()).await?;
        upstream::decode(&body)
    }

    async fn fetch_history(
        &self,
        coin_id: &CoinId,
        days: u32,
    ) -> Result<Vec<TrendPoint>, FetchError> {
        let body = self
            .fetch_queued(self.endpoints.market_chart(coin_id, days))
            .await?;
        let series = upstream::decode_price_series(&body)?;
        Ok(self.smoother.smooth(&series))
    }
}

#[async_trait]
impl MarketData for MarketService {
    async fn coin_list(&self) -> Result<Vec<CoinSummary>, FetchError> {
        if let Some(coins) = self.cache.get::<Vec<CoinSummary>>(COIN_LIST_KEY) {
            debug!(count = coins.len(), "Coin list served from cache");
            return Ok(coins);
        }

        match self.fetch_coin_list().await {
            Ok(coins) => {
                info!(count = coins.len(), "Fetched coin list");
                self.cache.put(COIN_LIST_KEY, &coins);
                Ok(coins)
            }
            Err(e) => {
                log_failure("coins_list", &e);
                Err(e)
            }
        }
    }

    async fn coin_history(
        &self,
        coin_id: &CoinId,
        days: u32,
    ) -> Result<Vec<TrendPoint>, FetchError> {
        let key = history_key(coin_id, days, &self.smoother);
        if let Some(history) = self.cache.get::<Vec<TrendPoint>>(&key) {
            debug!(coin = %coin_id, days, points = history.len(), "History served from cache");
            return Ok(history);
        }

        match self.fetch_history(coin_id, days).await {
            Ok(history) => {
                info!(coin = %coin_id, days, points = history.len(), "Fetched price history");
                self.cache.put(&key, &history);
                Ok(history)
            }
            Err(e) => {
                log_failure(&key, &e);
                Err(e)
            }
        }
    }
}

fn log_failure(what: &str, error: &FetchError) {
    if error.is_rate_limited() {
        warn!(request = what, "Upstream rate limit hit");
    } else {
        warn!(request = what, error = %error, "Upstream request failed");
    }
}

impl std::fmt::Debug for MarketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketService")
            .field("queue", &self.queue)
            .field("cache", &self.cache)
            .field("endpoints", &self.endpoints)
            .field("smoother", &self.smoother)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapter::outbound::memory::MemoryMedium;
    use crate::application::cache::default_freshness;
    use crate::domain::SeedPolicy;
    use crate::port::outbound::cache::CacheMedium;
    use crate::testkit::domain::{market_chart_body, markets_body};
    use crate::testkit::fetch::ScriptedFetcher;

    fn service(fetcher: Arc<ScriptedFetcher>) -> (MarketService, Arc<MemoryMedium>) {
        let medium = Arc::new(MemoryMedium::new());
        let service = MarketService::new(
            fetcher,
            RequestQueue::new(Duration::from_millis(1200)),
            TimedCache::new(medium.clone(), default_freshness()),
            Endpoints::new("http://upstream.test/api/v3", "usd", 10).unwrap(),
            TrendSmoother::default(),
        );
        (service, medium)
    }

    #[test]
    fn history_key_format() {
        assert_eq!(
            history_key(&CoinId::new("bitcoin"), 365, &TrendSmoother::default()),
            "history_bitcoin_365_ema30_first_price"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cold_history_fetches_once_then_serves_cache() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond("market_chart", market_chart_body(365)));
        let (service, _) = service(fetcher.clone());
        let bitcoin = CoinId::new("bitcoin");

        let first = service.coin_history(&bitcoin, 365).await.unwrap();
        assert_eq!(first.len(), 365);
        assert_eq!(fetcher.calls(), 1);

        let second = service.coin_history(&bitcoin, 365).await.unwrap();
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn history_request_targets_market_chart() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond("market_chart", market_chart_body(3)));
        let (service, _) = service(fetcher.clone());

        service.coin_history(&CoinId::new("ethereum"), 30).await.unwrap();

        assert_eq!(
            fetcher.requests(),
            vec!["http://upstream.test/api/v3/coins/ethereum/market_chart?vs_currency=usd&days=30&interval=daily".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn history_is_smoothed() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            "market_chart",
            r#"{"prices": [[1000, 100.0], [2000, 130.0]]}"#,
        ));
        let (service, _) = service(fetcher);

        let history = service.coin_history(&CoinId::new("x"), 2).await.unwrap();
        assert_eq!(history[0].ema, Some(100.0));
        let ema = history[1].ema.unwrap();
        assert!((ema - 101.935_483_870_967_74).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_surfaces_and_leaves_cache_empty() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().fail("market_chart", FetchError::RateLimited { status: 429 }),
        );
        let (service, medium) = service(fetcher);

        let err = service
            .coin_history(&CoinId::new("bitcoin"), 365)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert!(medium.keys().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_body_is_parse_failure_and_not_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond("market_chart", "{\"prices\": 7}"));
        let (service, medium) = service(fetcher);

        let err = service
            .coin_history(&CoinId::new("bitcoin"), 365)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ParseFailure { .. }));
        assert!(medium.keys().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn coin_list_goes_through_queue_and_is_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            "coins/markets",
            markets_body(&[("bitcoin", "btc", 64000.0), ("ethereum", "eth", 3100.0)]),
        ));
        let (service, medium) = service(fetcher.clone());

        let coins = service.coin_list().await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1].id, CoinId::new("ethereum"));
        assert_eq!(service.queue().dispatched(), 1);

        let again = service.coin_list().await.unwrap();
        assert_eq!(again, coins);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(medium.keys().unwrap(), vec![COIN_LIST_KEY.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn calm_price_is_last_ema() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            "market_chart",
            r#"{"prices": [[1000, 100.0], [2000, 130.0]]}"#,
        ));
        let (service, _) = service(fetcher);

        let calm = service.calm_price(&CoinId::new("x"), 2).await.unwrap().unwrap();
        assert!((calm - 101.935_483_870_967_74).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_days_use_distinct_keys() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond("market_chart", market_chart_body(5)));
        let (service, medium) = service(fetcher.clone());
        let bitcoin = CoinId::new("bitcoin");

        service.coin_history(&bitcoin, 30).await.unwrap();
        service.coin_history(&bitcoin, 90).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(
            medium.keys().unwrap(),
            vec![
                "history_bitcoin_30_ema30_first_price".to_string(),
                "history_bitcoin_90_ema30_first_price".to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn changed_seed_policy_does_not_reuse_cached_trend() {
        let medium = Arc::new(MemoryMedium::new());
        let fetcher = Arc::new(ScriptedFetcher::new().respond("market_chart", market_chart_body(365)));
        let with_smoother = |smoother| {
            MarketService::new(
                fetcher.clone(),
                RequestQueue::new(Duration::from_millis(1200)),
                TimedCache::new(medium.clone(), default_freshness()),
                Endpoints::new("http://upstream.test/api/v3", "usd", 10).unwrap(),
                smoother,
            )
        };
        let bitcoin = CoinId::new("bitcoin");

        let first_price = with_smoother(TrendSmoother::default());
        let seeded = first_price.coin_history(&bitcoin, 365).await.unwrap();
        assert_eq!(seeded[0].ema, Some(100.0));

        let warmup = with_smoother(TrendSmoother::new(30, SeedPolicy::Warmup));
        let warmed = warmup.coin_history(&bitcoin, 365).await.unwrap();
        assert_eq!(warmed[0].ema, None);
        assert!(warmed[29].ema.is_some());
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(medium.len(), 2);

        let again = first_price.coin_history(&bitcoin, 365).await.unwrap();
        assert_eq!(again, seeded);
        assert_eq!(fetcher.calls(), 2);
    }
}
