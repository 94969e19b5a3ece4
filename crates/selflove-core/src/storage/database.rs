//! SQLite-backed record store.
//!
//! A single `kv` table holds every record, keyed by the constants in
//! [`super::keys`]. The database lives at `~/.config/selflove/selflove.db`.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, StateStore};
use crate::error::StorageError;

/// Durable key-value store over a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `~/.config/selflove/selflove.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("selflove.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (non-durable; useful for tests).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("selflove_user").unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("selflove_user", r#"{"name":"mio"}"#).unwrap();
        assert_eq!(
            store.get("selflove_user").unwrap().as_deref(),
            Some(r#"{"name":"mio"}"#)
        );
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("selflove_mirror_count", "1").unwrap();
        store.set("selflove_mirror_count", "2").unwrap();
        assert_eq!(store.get("selflove_mirror_count").unwrap().as_deref(), Some("2"));
    }
}
