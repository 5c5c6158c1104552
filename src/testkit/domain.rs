//! Builders for upstream payloads and domain primitives used across tests.

use serde_json::json;

use crate::domain::{CoinId, PricePoint};

/// First sample timestamp used by generated charts (2024-01-01T00:00:00Z).
pub const CHART_START_MS: i64 = 1_704_067_200_000;

const DAY_MS: i64 = 86_400_000;

/// A market-chart body with `n` daily samples starting at
/// [`CHART_START_MS`], prices `100.0, 101.0, ...`.
pub fn market_chart_body(n: usize) -> String {
    chart_body(&ramp(n))
}

/// A market-chart body for the given samples.
pub fn chart_body(series: &[PricePoint]) -> String {
    let prices: Vec<_> = series.iter().map(|p| json!([p.timestamp, p.price])).collect();
    json!({ "prices": prices, "market_caps": [], "total_volumes": [] }).to_string()
}

/// `n` daily samples with prices `100.0, 101.0, ...`.
pub fn ramp(n: usize) -> Vec<PricePoint> {
    (0..n)
        .map(|i| PricePoint::new(CHART_START_MS + i as i64 * DAY_MS, 100.0 + i as f64))
        .collect()
}

/// A coins/markets body listing `(id, symbol, price)` in order.
pub fn markets_body(coins: &[(&str, &str, f64)]) -> String {
    let rows: Vec<_> = coins
        .iter()
        .map(|(id, symbol, price)| {
            json!({
                "id": id,
                "symbol": symbol,
                "name": title(id),
                "image": format!("https://assets.test/{id}.png"),
                "current_price": price,
                "market_cap": 1_000_000,
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

/// Create a [`CoinId`] from a string.
pub fn coin(id: &str) -> CoinId {
    CoinId::new(id)
}

fn title(id: &str) -> String {
    let mut chars = id.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
