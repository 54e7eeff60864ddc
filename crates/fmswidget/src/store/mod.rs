//! Access to the shared widget key-value store.
//!
//! The application writes through [`SnapshotWriter`]; renderers read through
//! [`SnapshotStore`]. Reads never fail from the caller's point of view: a
//! missing key, a value of the wrong type, or a backend fault all yield the
//! supplied default.

mod schema;
mod sqlite;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::Result;

pub use sqlite::SqliteStore;

/// Store keys shared by the application and both renderers.
pub mod keys {
    /// Integer: open jobs.
    pub const JOB_OPEN_COUNT: &str = "job_open_count";
    /// Integer: jobs in progress.
    pub const JOB_ONGOING_COUNT: &str = "job_ongoing_count";
    /// Integer: completed jobs.
    pub const JOB_COMPLETE_COUNT: &str = "job_complete_count";
    /// String: JSON array of `{title, status, time}`.
    pub const JOB_RECENT_LIST: &str = "job_recent_list";
    /// Integer: active vehicles.
    pub const MAP_ACTIVE_COUNT: &str = "map_active_count";
    /// String: absolute path of the last map snapshot image.
    pub const MAP_IMAGE_PATH: &str = "map_image_path";

    /// Every key of the snapshot contract.
    pub const ALL: &[&str] = &[
        JOB_OPEN_COUNT,
        JOB_ONGOING_COUNT,
        JOB_COMPLETE_COUNT,
        JOB_RECENT_LIST,
        MAP_ACTIVE_COUNT,
        MAP_IMAGE_PATH,
    ];
}

/// Read side of the shared store, as seen by a renderer.
pub trait SnapshotStore {
    /// Read an integer, or `default` if the key is absent or not an integer.
    fn get_int(&self, key: &str, default: i64) -> i64;

    /// Read a string, or `default` if the key is absent or not a string.
    fn get_string(&self, key: &str, default: Option<&str>) -> Option<String>;
}

/// Write side of the shared store, owned by the application.
pub trait SnapshotWriter {
    /// Store an integer under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn put_int(&self, key: &str, value: i64) -> Result<()>;

    /// Store a string under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn put_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A typed value held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    /// Integer value.
    Int(i64),
    /// String value.
    Text(String),
}

/// In-process store, used as the fake in tests and for dry runs.
///
/// Each key read or write is atomic; there is no multi-key transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style integer insert, for setting up fixtures.
    #[must_use]
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.insert(key, StoredValue::Int(value));
        self
    }

    /// Builder-style string insert, for setting up fixtures.
    #[must_use]
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.insert(key, StoredValue::Text(value.to_string()));
        self
    }

    /// Look up the raw stored value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: &str, value: StoredValue) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

impl SnapshotStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(StoredValue::Int(value)) => value,
            Some(StoredValue::Text(_)) => {
                debug!(key, "Expected integer, found string; using default");
                default
            }
            None => default,
        }
    }

    fn get_string(&self, key: &str, default: Option<&str>) -> Option<String> {
        match self.get(key) {
            Some(StoredValue::Text(value)) => Some(value),
            Some(StoredValue::Int(_)) => {
                debug!(key, "Expected string, found integer; using default");
                default.map(str::to_string)
            }
            None => default.map(str::to_string),
        }
    }
}

impl SnapshotWriter for MemoryStore {
    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        self.insert(key, StoredValue::Int(value));
        Ok(())
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key, StoredValue::Text(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
