//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the upstream HTTP
//! service and the local key/value medium backing the cache.

pub mod cache;
pub mod fetch;
