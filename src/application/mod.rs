//! Application services (use cases).
//!
//! These services compose the domain transform with the outbound ports to
//! implement the acquisition pipeline: cache lookup, queued fetch, trend
//! transform, cache write.

pub mod cache;
pub mod market;
pub mod queue;
