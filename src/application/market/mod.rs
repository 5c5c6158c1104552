//! Acquisition façade over the upstream market API.
//!
//! [`MarketService`] implements the inbound [`MarketData`] port:
//! cache lookup, queued fetch, parse, trend transform, cache write.
//!
//! [`MarketData`]: crate::port::inbound::market::MarketData

pub mod service;
pub mod upstream;

pub use service::{history_key, MarketService, COIN_LIST_KEY};
pub use upstream::{Endpoints, DEFAULT_BASE_URL};
