//! SQLite-backed ordered store.
//!
//! Entries live in a single `WITHOUT ROWID` table keyed by a BLOB primary key.
//! SQLite compares BLOBs with `memcmp`, so the clustered key order is the
//! byte-wise order the queue relies on.
//!
//! ```text
//! {data_dir}/
//! ├── queue.db
//! ├── queue.db-wal
//! └── queue.db-shm
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use levelq_config::SyncMode;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::KvStore;

/// File name of the database inside the data directory.
pub const DB_FILE: &str = "queue.db";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    key   BLOB PRIMARY KEY NOT NULL,
    value BLOB NOT NULL
) WITHOUT ROWID;
"#;

/// Durable store in a SQLite file.
pub struct SqliteStore {
    dir: PathBuf,
    // `Connection` is `!Sync`; the queue lock already serializes callers.
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Open the store in `dir`, creating the directory and database if missing.
    pub fn open(dir: impl Into<PathBuf>, sync_mode: SyncMode) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let conn = Connection::open(dir.join(DB_FILE))?;
        let journal: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", sync_mode.as_pragma())?;
        conn.execute_batch(SCHEMA)?;

        debug!(
            "SqliteStore opened at {:?} (journal={}, synchronous={})",
            dir, journal, sync_mode
        );

        Ok(Self {
            dir,
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Directory holding the database files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(f(conn)?)
    }
}

impl KvStore for SqliteStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO entries (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
        })?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
        })?
        .ok_or(StoreError::NotFound)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.with_conn(|conn| conn.execute("DELETE FROM entries WHERE key = ?1", params![key]))?;
        Ok(())
    }

    fn first_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT key FROM entries ORDER BY key ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn last_key(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT key FROM entries ORDER BY key DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn keys_after(&self, start: Option<&[u8]>, limit: usize) -> Result<Vec<Vec<u8>>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(|conn| match start {
            Some(start) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT key FROM entries WHERE key > ?1 ORDER BY key ASC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![start, limit], |row| row.get(0))?;
                rows.collect::<rusqlite::Result<Vec<Vec<u8>>>>()
            }
            None => {
                let mut stmt =
                    conn.prepare_cached("SELECT key FROM entries ORDER BY key ASC LIMIT ?1")?;
                let rows = stmt.query_map(params![limit], |row| row.get(0))?;
                rows.collect::<rusqlite::Result<Vec<Vec<u8>>>>()
            }
        })
    }

    fn close(&mut self) -> Result<(), StoreError> {
        let slot = self.conn.get_mut();
        let Some(conn) = slot.take() else {
            return Ok(());
        };

        if let Err((conn, e)) = conn.close() {
            warn!("Failed to close SqliteStore at {:?}: {}", self.dir, e);
            *slot = Some(conn);
            return Err(e.into());
        }

        debug!("SqliteStore closed at {:?}", self.dir);
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), StoreError> {
        self.close()?;

        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!("SqliteStore removed {:?}", self.dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &Path) -> SqliteStore {
        SqliteStore::open(dir, SyncMode::Normal).unwrap()
    }

    #[test]
    fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("queue");

        let store = open(&dir);
        assert!(dir.join(DB_FILE).exists());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_put_get_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(temp_dir.path());

        store.put(b"k1", b"v1").unwrap();
        assert_eq!(store.get(b"k1").unwrap(), b"v1");

        store.put(b"k1", b"v2").unwrap();
        assert_eq!(store.get(b"k1").unwrap(), b"v2");

        store.delete(b"k1").unwrap();
        assert!(matches!(store.get(b"k1"), Err(StoreError::NotFound)));

        // Deleting a missing key is fine.
        store.delete(b"k1").unwrap();
    }

    #[test]
    fn test_blob_keys_sort_bytewise() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(temp_dir.path());

        for id in [256u64, 1, 65_536, 2, 255] {
            store.put(&id.to_be_bytes(), b"x").unwrap();
        }

        assert_eq!(store.first_key().unwrap().unwrap(), 1u64.to_be_bytes());
        assert_eq!(store.last_key().unwrap().unwrap(), 65_536u64.to_be_bytes());

        let keys = store.keys_after(Some(&2u64.to_be_bytes()[..]), 2).unwrap();
        assert_eq!(keys, vec![255u64.to_be_bytes().to_vec(), 256u64.to_be_bytes().to_vec()]);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open(temp_dir.path());
            store.put(b"a", b"1").unwrap();
            store.close().unwrap();
        }

        let store = open(temp_dir.path());
        assert_eq!(store.get(b"a").unwrap(), b"1");
    }

    #[test]
    fn test_closed_store_rejects_operations() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(temp_dir.path());

        store.close().unwrap();
        store.close().unwrap();

        assert!(matches!(store.put(b"a", b"1"), Err(StoreError::Closed)));
        assert!(matches!(store.get(b"a"), Err(StoreError::Closed)));
        assert!(matches!(store.first_key(), Err(StoreError::Closed)));
    }

    #[test]
    fn test_destroy_removes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("queue");
        let mut store = open(&dir);
        store.put(b"a", b"1").unwrap();

        store.destroy().unwrap();
        assert!(!dir.exists());

        // Already gone.
        store.destroy().unwrap();
    }
}
