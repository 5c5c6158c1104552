//! Handler for the `calm` command.
//!
//! Lists the top coins, then walks their histories one at a time through the
//! request queue. A coin whose history cannot be fetched is reported and
//! skipped; the rest of the run continues.

use serde_json::json;
use tabled::{Table, Tabled};
use tracing::warn;

use crate::adapter::inbound::cli::output;
use crate::domain::CoinSummary;
use crate::error::{FetchError, Result};
use crate::port::inbound::market::MarketData;

/// Calm price outcome for one listed coin.
#[derive(Debug)]
pub struct CalmEntry {
    pub coin: CoinSummary,
    /// `Ok(None)` when the coin has no history.
    pub calm: std::result::Result<Option<f64>, FetchError>,
}

impl CalmEntry {
    /// Current price relative to the calm price, in percent.
    #[must_use]
    pub fn deviation_pct(&self) -> Option<f64> {
        match (self.coin.current_price, &self.calm) {
            (Some(current), Ok(Some(calm))) if *calm != 0.0 => {
                Some((current - calm) / calm * 100.0)
            }
            _ => None,
        }
    }
}

/// Fetch the coin list, then each coin's calm price in listing order.
///
/// `on_progress` is called before each history request with the 1-based
/// position and the coin.
///
/// # Errors
///
/// Fails only if the coin list itself cannot be fetched.
pub async fn calm_report(
    market: &dyn MarketData,
    days: u32,
    mut on_progress: impl FnMut(usize, usize, &CoinSummary),
) -> std::result::Result<Vec<CalmEntry>, FetchError> {
    let coins = market.coin_list().await?;
    let total = coins.len();
    let mut entries = Vec::with_capacity(total);

    for (i, coin) in coins.into_iter().enumerate() {
        on_progress(i + 1, total, &coin);
        let calm = market.calm_price(&coin.id, days).await;
        if let Err(e) = &calm {
            warn!(coin = %coin.id, error = %e, "Skipping coin");
        }
        entries.push(CalmEntry { coin, calm });
    }

    Ok(entries)
}

#[derive(Tabled)]
struct CalmRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Calm")]
    calm: String,
    #[tabled(rename = "vs Calm")]
    deviation: String,
}

fn row(entry: &CalmEntry) -> CalmRow {
    CalmRow {
        symbol: entry.coin.ticker(),
        price: entry
            .coin
            .current_price
            .map_or_else(|| "-".to_string(), output::price),
        calm: match &entry.calm {
            Ok(Some(calm)) => output::price(*calm),
            Ok(None) => "-".to_string(),
            Err(_) => output::muted("unavailable"),
        },
        deviation: entry
            .deviation_pct()
            .map_or_else(|| "-".to_string(), output::percent_change),
    }
}

/// Execute `calm`.
pub async fn execute(market: &dyn MarketData, days: u32) -> Result<()> {
    let pb = output::spinner("Fetching coin list");
    let report = calm_report(market, days, |i, total, coin| {
        pb.set_message(format!("Fetching history {i}/{total} ({})", coin.id));
    })
    .await;

    let entries = match report {
        Ok(entries) => {
            let failed = entries.iter().filter(|e| e.calm.is_err()).count();
            output::spinner_success(
                &pb,
                &format!("{} coins, {failed} unavailable", entries.len()),
            );
            entries
        }
        Err(e) => {
            output::spinner_fail(&pb, "Coin list unavailable");
            return Err(e.into());
        }
    };

    if output::is_json() {
        let coins: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "id": e.coin.id,
                    "symbol": e.coin.symbol,
                    "current_price": e.coin.current_price,
                    "calm_price": e.calm.as_ref().ok().copied().flatten(),
                    "deviation_pct": e.deviation_pct(),
                    "error": e.calm.as_ref().err().map(ToString::to_string),
                })
            })
            .collect();
        output::json_output(json!({
            "command": "calm",
            "days": days,
            "coins": coins,
        }));
        return Ok(());
    }

    output::section(&format!("Calm prices ({days}-day history)"));
    output::lines(&Table::new(entries.iter().map(row)).to_string());

    for entry in &entries {
        if let Err(e) = &entry.calm {
            let reason = if e.is_rate_limited() {
                "rate limited, try again shortly".to_string()
            } else {
                e.to_string()
            };
            output::warning(&format!("{}: {reason}", entry.coin.id));
        }
    }
    Ok(())
}
