use std::sync::Arc;

use calmprice::application::market::MarketService;
use calmprice::infrastructure::bootstrap::build_market_service_with;
use calmprice::testkit::config;
use calmprice::testkit::fetch::ScriptedFetcher;

/// Market service over an in-memory cache and a scripted upstream.
///
/// Returns the fetcher too so tests can inspect the calls it saw.
pub fn scripted_market(
    fetcher: ScriptedFetcher,
    min_delay_ms: u64,
) -> (MarketService, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(fetcher);
    let market = build_market_service_with(&config::memory(min_delay_ms), fetcher.clone())
        .expect("build market service");
    (market, fetcher)
}
