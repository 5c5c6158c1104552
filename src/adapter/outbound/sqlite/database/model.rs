//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::cache_entries;

/// Database row for a cache entry.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = cache_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CacheEntryRow {
    pub key: String,
    pub payload: String,
}

/// Borrowed cache entry for inserts.
#[derive(Insertable, Debug)]
#[diesel(table_name = cache_entries)]
pub struct NewCacheEntry<'a> {
    pub key: &'a str,
    pub payload: &'a str,
}
