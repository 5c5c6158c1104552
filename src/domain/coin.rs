//! Coin listing types.

use serde::{Deserialize, Serialize};

use super::id::CoinId;

/// One row of the "top N by market capitalization" listing.
///
/// `current_price` is optional because the upstream reports `null` for
/// coins it has no recent trade for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: CoinId,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: Option<f64>,
}

impl CoinSummary {
    /// Upper-cased ticker symbol for display (`"btc"` -> `"BTC"`).
    #[must_use]
    pub fn ticker(&self) -> String {
        self.symbol.to_uppercase()
    }
}
