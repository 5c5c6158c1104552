//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fetch`] - [`ScriptedFetcher`](fetch::ScriptedFetcher), a fake upstream
//!   that answers by URL substring and records every request.
//! - [`medium`] - Cache media with failure behavior.
//! - [`domain`] - Upstream payload builders and domain primitives.
//! - [`config`] - Canonical test configuration.

pub mod config;
pub mod domain;
pub mod fetch;
pub mod medium;
