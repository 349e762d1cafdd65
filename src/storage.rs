use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// The durable store cannot be read or written. Writes are best-effort for
/// the caller: the in-memory collection keeps the record either way.
#[derive(Debug, Error)]
#[error("storage unavailable: {reason}")]
pub struct StorageUnavailable {
    reason: String,
}

impl StorageUnavailable {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageUnavailable {
    fn from(e: rusqlite::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Key-value storage boundary: whole values replaced wholesale under a key,
/// the way browser-local storage behaves.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageUnavailable>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageUnavailable>;
}

/// SQLite-backed store: one `kv` table, one row per key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StorageUnavailable> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
               key   TEXT PRIMARY KEY,
               value TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageUnavailable> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral runs. Clones share the same map,
/// like two handles onto the same origin's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl Storage for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageUnavailable> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_store_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        let mut store = SqliteStore::open(&path).unwrap();
        assert!(store.read("workouts").unwrap().is_none());

        store.write("workouts", "[1]").unwrap();
        assert_eq!(store.read("workouts").unwrap().as_deref(), Some("[1]"));

        store.write("workouts", "[1,2]").unwrap();
        assert_eq!(store.read("workouts").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.write("workouts", "persisted").unwrap();
        drop(store);

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.read("workouts").unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[test]
    fn memory_store_clones_share_state() {
        let mut a = MemoryStore::default();
        let b = a.clone();
        a.write("workouts", "[]").unwrap();
        assert_eq!(b.read("workouts").unwrap().as_deref(), Some("[]"));
    }
}
