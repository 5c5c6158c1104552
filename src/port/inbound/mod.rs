//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`market`]: the two read operations exposed to presentation drivers

pub mod market;
