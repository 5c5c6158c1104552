//! Handler for the `coins` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::CoinSummary;
use crate::error::Result;
use crate::port::inbound::market::MarketData;

#[derive(Tabled)]
struct CoinRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

fn rows(coins: &[CoinSummary]) -> Vec<CoinRow> {
    coins
        .iter()
        .enumerate()
        .map(|(i, coin)| CoinRow {
            rank: i + 1,
            id: coin.id.to_string(),
            symbol: coin.ticker(),
            name: coin.name.clone(),
            price: coin
                .current_price
                .map_or_else(|| "-".to_string(), output::price),
        })
        .collect()
}

/// Execute `coins`.
pub async fn execute(market: &dyn MarketData) -> Result<()> {
    let pb = output::spinner("Fetching coin list");
    let coins = match market.coin_list().await {
        Ok(coins) => {
            output::spinner_success(&pb, &format!("{} coins", coins.len()));
            coins
        }
        Err(e) => {
            output::spinner_fail(&pb, "Coin list unavailable");
            return Err(e.into());
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "coins",
            "coins": coins,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Top coins by market cap");
    output::lines(&Table::new(rows(&coins)).to_string());
    output::hint(&format!(
        "run {} for a trend line",
        output::highlight("calmprice history <id>")
    ));
    Ok(())
}
