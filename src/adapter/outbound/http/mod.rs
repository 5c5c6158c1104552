//! HTTP fetch adapter.

pub mod client;

pub use client::HttpFetcher;
