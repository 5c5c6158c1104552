//! Handler for the `history` command.

use chrono::{TimeZone, Utc};
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::{calm_price, CoinId, TrendPoint};
use crate::error::Result;
use crate::port::inbound::market::MarketData;

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "EMA")]
    ema: String,
}

fn date(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map_or_else(|| timestamp_ms.to_string(), |t| t.format("%Y-%m-%d").to_string())
}

/// The last `tail` points, or all of them.
fn tail_of(history: &[TrendPoint], tail: Option<usize>) -> &[TrendPoint] {
    match tail {
        Some(n) => &history[history.len().saturating_sub(n)..],
        None => history,
    }
}

fn rows(points: &[TrendPoint]) -> Vec<TrendRow> {
    points
        .iter()
        .map(|p| TrendRow {
            date: date(p.timestamp),
            price: output::price(p.price),
            ema: p.ema.map_or_else(|| "-".to_string(), output::price),
        })
        .collect()
}

/// Execute `history <coin>`.
pub async fn execute(
    market: &dyn MarketData,
    coin: &str,
    days: u32,
    tail: Option<usize>,
) -> Result<()> {
    let coin_id = CoinId::new(coin);
    let pb = output::spinner(&format!("Fetching {days}-day history of {coin_id}"));
    let history = match market.coin_history(&coin_id, days).await {
        Ok(history) => {
            output::spinner_success(&pb, &format!("{} points", history.len()));
            history
        }
        Err(e) => {
            output::spinner_fail(&pb, &format!("History of {coin_id} unavailable"));
            return Err(e.into());
        }
    };

    let calm = calm_price(&history);
    let shown = tail_of(&history, tail);

    if output::is_json() {
        output::json_output(json!({
            "command": "history",
            "coin": coin_id,
            "days": days,
            "calm_price": calm,
            "points": shown,
        }));
        return Ok(());
    }

    output::section(&format!("{coin_id} over {days} days"));
    if shown.is_empty() {
        output::note("(no data)");
    } else {
        output::lines(&Table::new(rows(shown)).to_string());
    }
    if shown.len() < history.len() {
        output::note(&format!("showing last {} of {}", shown.len(), history.len()));
    }

    if let Some(calm) = calm {
        output::field("Calm price", output::highlight(output::price(calm)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(timestamp: i64, price: f64, ema: Option<f64>) -> TrendPoint {
        TrendPoint {
            timestamp,
            price,
            ema,
        }
    }

    #[test]
    fn tail_keeps_last_points() {
        let history: Vec<_> = (0..5).map(|i| point(i, i as f64, None)).collect();
        assert_eq!(tail_of(&history, Some(2)).len(), 2);
        assert_eq!(tail_of(&history, Some(2))[0].timestamp, 3);
        assert_eq!(tail_of(&history, Some(10)).len(), 5);
        assert_eq!(tail_of(&history, None).len(), 5);
        assert!(tail_of(&history, Some(0)).is_empty());
    }

    #[test]
    fn rows_format_dates_and_missing_ema() {
        let rows = rows(&[point(1_704_067_200_000, 42_000.0, None)]);
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[0].price, "42000.00");
        assert_eq!(rows[0].ema, "-");
    }
}
