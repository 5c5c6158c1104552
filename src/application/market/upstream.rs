//! Upstream endpoint construction and response decoding.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::domain::{CoinId, PricePoint};
use crate::error::{ConfigError, FetchError};

/// Default CoinGecko API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Builds the two upstream URLs from a configurable API root.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    vs_currency: String,
    top_n: u32,
}

impl Endpoints {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(
        base_url: &str,
        vs_currency: impl Into<String>,
        top_n: u32,
    ) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: format!("expected an http(s) URL, got {base_url}"),
            });
        }

        Ok(Self {
            base,
            vs_currency: vs_currency.into(),
            top_n,
        })
    }

    /// `GET /coins/markets` for the top N by market capitalization.
    #[must_use]
    pub fn markets(&self) -> String {
        let mut url = self.with_path(&["coins", "markets"]);
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.vs_currency)
            .append_pair("order", "market_cap_desc")
            .append_pair("per_page", &self.top_n.to_string())
            .append_pair("page", "1")
            .append_pair("sparkline", "false");
        url.into()
    }

    /// `GET /coins/{id}/market_chart` with daily samples over `days`.
    #[must_use]
    pub fn market_chart(&self, coin_id: &CoinId, days: u32) -> String {
        let mut url = self.with_path(&["coins", coin_id.as_str(), "market_chart"]);
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.vs_currency)
            .append_pair("days", &days.to_string())
            .append_pair("interval", "daily");
        url.into()
    }

    fn with_path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartDto {
    /// `[timestamp_ms, price]` pairs. Timestamps arrive as JSON numbers that
    /// are integral in practice; they are read as floats to tolerate `.0`.
    prices: Vec<(f64, f64)>,
}

/// Decode a JSON body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::parse(e.to_string()))
}

/// Decode a market-chart body into its ordered price series.
pub(crate) fn decode_price_series(body: &[u8]) -> Result<Vec<PricePoint>, FetchError> {
    let chart: MarketChartDto = decode(body)?;
    Ok(chart
        .prices
        .into_iter()
        .map(|(timestamp, price)| PricePoint::new(timestamp as i64, price))
        .collect())
}
