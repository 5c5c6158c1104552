//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement the outbound ports; the application implements the
//! inbound port that presentation drivers (the CLI) call into.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!      CLI ────────▶ │      MarketData         │
//!                    │   (inbound, façade)     │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!          ┌───────────┐                   ┌─────────────┐
//!          │  Fetcher  │                   │ CacheMedium │
//!          │  (HTTP)   │                   │ (SQLite/mem)│
//!          └───────────┘                   └─────────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::market::MarketData;
pub use outbound::cache::CacheMedium;
pub use outbound::fetch::Fetcher;
