//! SQLite-backed cache medium.

use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::{CacheEntryRow, NewCacheEntry};
use super::database::schema::cache_entries;
use crate::error::{Error, Result};
use crate::port::outbound::cache::CacheMedium;

/// Cache medium persisted in the `cache_entries` table.
///
/// Expects the schema to be migrated already (see
/// [`run_migrations`](super::database::connection::run_migrations)).
pub struct SqliteMedium {
    pool: DbPool,
}

impl SqliteMedium {
    /// Create a new medium over the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

impl CacheMedium for SqliteMedium {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn()?;
        let row: Option<CacheEntryRow> = cache_entries::table
            .find(key)
            .select(CacheEntryRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|row| row.payload))
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::replace_into(cache_entries::table)
            .values(&NewCacheEntry { key, payload })
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(cache_entries::table.find(key))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        cache_entries::table
            .select(cache_entries::key)
            .order(cache_entries::key.asc())
            .load::<String>(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn clear(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        diesel::delete(cache_entries::table)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

impl std::fmt::Debug for SqliteMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteMedium")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{
        create_pool, run_migrations, MEMORY_URL,
    };

    fn medium() -> SqliteMedium {
        let pool = create_pool(MEMORY_URL).unwrap();
        run_migrations(&pool).unwrap();
        SqliteMedium::new(pool)
    }

    #[test]
    fn read_missing_is_none() {
        assert_eq!(medium().read("nope").unwrap(), None);
    }

    #[test]
    fn write_replaces_existing_payload() {
        let medium = medium();
        medium.write("coins_list", "[1]").unwrap();
        medium.write("coins_list", "[2]").unwrap();

        assert_eq!(medium.read("coins_list").unwrap().as_deref(), Some("[2]"));
        assert_eq!(medium.keys().unwrap(), vec!["coins_list".to_string()]);
    }

    #[test]
    fn remove_reports_existence() {
        let medium = medium();
        medium.write("k", "v").unwrap();
        assert!(medium.remove("k").unwrap());
        assert!(!medium.remove("k").unwrap());
    }

    #[test]
    fn keys_sorted_and_clear_counts() {
        let medium = medium();
        medium.write("history_eth_30", "{}").unwrap();
        medium.write("coins_list", "{}").unwrap();
        medium.write("history_btc_365", "{}").unwrap();

        assert_eq!(
            medium.keys().unwrap(),
            vec!["coins_list", "history_btc_365", "history_eth_30"]
        );
        assert_eq!(medium.clear().unwrap(), 3);
        assert!(medium.keys().unwrap().is_empty());
    }

    #[test]
    fn unmigrated_database_reports_error() {
        let medium = SqliteMedium::new(create_pool(MEMORY_URL).unwrap());
        assert!(matches!(medium.read("k"), Err(Error::Database(_))));
        assert!(medium.write("k", "v").is_err());
    }
}
