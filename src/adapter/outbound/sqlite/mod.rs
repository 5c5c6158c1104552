//! SQLite cache medium.
//!
//! Stores cache envelopes in a single `cache_entries` table using Diesel ORM.

pub mod database;
pub mod medium;

pub use medium::SqliteMedium;
