//! SQLite database modules.
//!
//! Provides connection pooling, embedded migrations, schema definitions, and
//! Diesel model types for the cache table.

pub mod connection;
pub mod model;
pub mod schema;
