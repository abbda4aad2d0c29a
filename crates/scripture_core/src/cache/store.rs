//! Durable blob storage behind the cache.
//!
//! # Invariants
//! - One blob per storage key; `save` replaces the whole blob.
//! - `load` of an unknown key is `Ok(None)`, never an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "durable store failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage seam for serialized cache maps.
pub trait CacheStore {
    fn load(&self, storage_key: &str) -> StoreResult<Option<String>>;
    fn save(&self, storage_key: &str, payload: &str) -> StoreResult<()>;
    fn remove(&self, storage_key: &str) -> StoreResult<()>;
}

/// SQLite-backed store over the `durable_store` table.
#[derive(Clone, Copy)]
pub struct SqliteCacheStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCacheStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CacheStore for SqliteCacheStore<'_> {
    fn load(&self, storage_key: &str) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM durable_store WHERE storage_key = ?1;",
                params![storage_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&self, storage_key: &str, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO durable_store (storage_key, payload, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![storage_key, payload],
        )?;
        Ok(())
    }

    fn remove(&self, storage_key: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM durable_store WHERE storage_key = ?1;",
            params![storage_key],
        )?;
        Ok(())
    }
}

/// Process-local store. Clones share the same blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob access for seeding or inspecting persisted state.
    pub fn blob(&self, storage_key: &str) -> Option<String> {
        self.blobs.borrow().get(storage_key).cloned()
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self, storage_key: &str) -> StoreResult<Option<String>> {
        Ok(self.blob(storage_key))
    }

    fn save(&self, storage_key: &str, payload: &str) -> StoreResult<()> {
        self.blobs
            .borrow_mut()
            .insert(storage_key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, storage_key: &str) -> StoreResult<()> {
        self.blobs.borrow_mut().remove(storage_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheStore, MemoryCacheStore, SqliteCacheStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_store_replaces_and_removes_blobs() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteCacheStore::new(&conn);

        assert_eq!(store.load("scripture_cache.books").unwrap(), None);
        store.save("scripture_cache.books", "{}").unwrap();
        store.save("scripture_cache.books", "{\"a\":1}").unwrap();
        assert_eq!(
            store.load("scripture_cache.books").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove("scripture_cache.books").unwrap();
        assert_eq!(store.load("scripture_cache.books").unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_blobs() {
        let store = MemoryCacheStore::new();
        let shared = store.clone();
        store.save("key", "payload").unwrap();
        assert_eq!(shared.blob("key").as_deref(), Some("payload"));
    }
}
