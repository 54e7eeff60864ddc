//! Durable widget store backed by `SQLite`.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use super::schema;
use super::{SnapshotStore, SnapshotWriter};
use crate::error::{Error, Result};

/// Shared key-value area persisted in a `SQLite` file.
///
/// Survives process restarts and reboots. Values keep their storage class, so
/// an integer written with [`SnapshotWriter::put_int`] is never returned by
/// [`SnapshotStore::get_string`] and vice versa.
///
/// Writers use [`SqliteStore::open`]. Renderers use
/// [`SqliteStore::open_read_only`], which never touches the file's content.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection; `None` for a read-only view of an absent or
    /// unusable store, which reads as empty.
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or its schema is
    /// unusable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening widget store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreOpen {
            path: path.clone(),
            source,
        })?;

        // The app writes while the widget process reads
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("Widget store opened at {}", path.display());
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    /// Open an existing store for reading only.
    ///
    /// Nothing is created and no schema or pragma is written. A missing or
    /// unreadable file reads as an empty store. A newer schema version is
    /// logged and read anyway.
    #[must_use]
    pub fn open_read_only(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            debug!("No widget store at {}, reading defaults", path.display());
            return Self { path, conn: None };
        }

        let conn = match Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ) {
            Ok(conn) => conn,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Widget store unreadable, reading defaults"
                );
                return Self { path, conn: None };
            }
        };

        let conn = match schema::has_widget_data(&conn) {
            Ok(true) => Some(conn),
            Ok(false) => {
                debug!("Widget store at {} has no data table yet", path.display());
                None
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Widget store unreadable, reading defaults"
                );
                None
            }
        };

        debug!("Widget store opened read-only at {}", path.display());
        Self { path, conn }
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Some(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List stored keys in lexical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let Some(conn) = &self.conn else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare("SELECT key FROM widget_data ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn lookup<T: rusqlite::types::FromSql>(&self, key: &str) -> rusqlite::Result<Option<T>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        conn.query_row(
                "SELECT value FROM widget_data WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
    }

    fn writable(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| Error::StoreReadOnly {
            path: self.path.clone(),
        })
    }

    fn upsert(&self, key: &str, value: &dyn rusqlite::ToSql) -> Result<()> {
        self.writable()?.execute(
            "INSERT OR REPLACE INTO widget_data (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SnapshotStore for SqliteStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.lookup::<i64>(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "Widget store read failed, using default");
                default
            }
        }
    }

    fn get_string(&self, key: &str, default: Option<&str>) -> Option<String> {
        match self.lookup::<String>(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => default.map(str::to_string),
            Err(e) => {
                warn!(key, error = %e, "Widget store read failed, using default");
                default.map(str::to_string)
            }
        }
    }
}

impl SnapshotWriter for SqliteStore {
    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        self.upsert(key, &value)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.upsert(key, &value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let affected = self
            .writable()?
            .execute("DELETE FROM widget_data WHERE key = ?1", [key])?;
        if affected > 0 {
            debug!(key, "Removed widget store key");
        }
        Ok(())
    }
}
