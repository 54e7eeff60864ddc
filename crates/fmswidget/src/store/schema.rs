//! `SQLite` schema for the durable widget store.
//!
//! The schema version lives in `PRAGMA user_version`. A database written by a
//! newer build is refused rather than guessed at.

use rusqlite::Connection;
use tracing::warn;

use crate::error::{Error, Result};

/// The schema version this build reads and writes.
pub const SCHEMA_VERSION: i32 = 1;

/// Key-value table. `value` has no declared type so integers and strings
/// keep their storage class.
const CREATE_WIDGET_DATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS widget_data (
    key TEXT PRIMARY KEY NOT NULL,
    value
)
";

/// Create the schema if needed and check its version.
///
/// # Errors
///
/// Returns an error if table creation fails or the database carries a schema
/// version newer than [`SCHEMA_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(Error::StoreMigration {
            message: format!(
                "store schema version {version} is newer than supported version {SCHEMA_VERSION}"
            ),
        });
    }

    conn.execute(CREATE_WIDGET_DATA_TABLE, [])?;

    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Check whether a database can be read as a widget store, without writing.
///
/// A newer schema version is logged and tolerated: the key table is still
/// queried, and any key it no longer holds reads as its default.
///
/// # Errors
///
/// Returns an error if the file is not a readable `SQLite` database.
pub fn has_widget_data(conn: &Connection) -> Result<bool> {
    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        warn!(
            version,
            supported = SCHEMA_VERSION,
            "Widget store schema is newer than this build, reading what matches"
        );
    }

    let tables: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'widget_data'",
        [],
        |row| row.get(0),
    )?;
    Ok(tables == 1)
}

/// Read the schema version; 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    #[test]
    fn test_initialize_creates_table() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='widget_data'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_initialize_sets_version() {
        let conn = create_test_db();
        assert_eq!(schema_version(&conn).unwrap(), 0);
        initialize_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_refused() {
        let conn = create_test_db();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_has_widget_data() {
        let conn = create_test_db();
        assert!(!has_widget_data(&conn).unwrap());

        initialize_schema(&conn).unwrap();
        assert!(has_widget_data(&conn).unwrap());

        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        assert!(has_widget_data(&conn).unwrap());
    }
}
