//! Calmprice - rate-limited coin prices with a calm trend line.
//!
//! Fetches the top coins and their price histories from a public market-data
//! API, keeps outbound requests spaced through a single serial queue, caches
//! responses for a freshness window, and smooths each history with an
//! exponential moving average.
//!
//! # Architecture
//!
//! - [`domain`] - Coin identifiers, price series, and the EMA smoother
//! - [`port`] - Inbound (`MarketData`) and outbound (`Fetcher`, `CacheMedium`) traits
//! - [`application`] - Request queue, timed cache, and the market service
//! - [`adapter`] - CLI, HTTP fetcher, in-memory and SQLite cache media
//! - [`infrastructure`] - Configuration and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use calmprice::infrastructure::bootstrap::build_market_service;
//! use calmprice::infrastructure::config::settings::Config;
//! use calmprice::port::inbound::market::MarketData;
//! use calmprice::domain::CoinId;
//!
//! # async fn run() -> calmprice::error::Result<()> {
//! let market = build_market_service(&Config::default())?;
//! let calm = market.calm_price(&CoinId::new("bitcoin"), 365).await?;
//! println!("{calm:?}");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
