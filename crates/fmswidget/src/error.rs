//! Error types for fmswidget.
//!
//! The render path never surfaces these: reads degrade to defaults and decode
//! or image failures degrade to empty lists and placeholders. Errors exist for
//! the write side (publishing a snapshot), store setup, and configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;
use crate::image::ImageError;

/// The main error type for fmswidget operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Failed to open or create the shared widget store.
    #[error("failed to open widget store at {path}: {source}")]
    StoreOpen {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A write was attempted on a store opened for reading.
    #[error("widget store at {path} is open read-only")]
    StoreReadOnly {
        /// Path to the store file.
        path: PathBuf,
    },

    /// A store query failed.
    #[error("widget store query failed: {0}")]
    StoreQuery(#[from] rusqlite::Error),

    /// Failed to run store schema migrations.
    #[error("widget store migration failed: {message}")]
    StoreMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Snapshot Errors ===
    /// The recent-jobs payload could not be decoded.
    #[error("recent jobs payload rejected: {0}")]
    Codec(#[from] CodecError),

    /// The map image could not be loaded.
    #[error("map image unavailable: {0}")]
    Image(#[from] ImageError),

    /// A counter does not fit the store's signed 64-bit integers.
    #[error("{key} value {value} is out of range")]
    CountOutOfRange {
        /// Store key being written.
        key: String,
        /// The rejected value.
        value: u64,
    },

    /// A widget name is not one of the known widgets.
    #[error("unknown widget kind: {name}")]
    UnknownWidget {
        /// The rejected name.
        name: String,
    },

    /// A deep-link URI is not one of the known targets.
    #[error("unrecognized deep link: {uri}")]
    DeepLink {
        /// The rejected URI.
        uri: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fmswidget operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a deep-link error for the given URI.
    #[must_use]
    pub fn deep_link(uri: impl Into<String>) -> Self {
        Self::DeepLink { uri: uri.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_deep_link_error_display() {
        let err = Error::deep_link("fms://settings");
        assert_eq!(err.to_string(), "unrecognized deep link: fms://settings");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_codec_error() {
        let err: Error = CodecError::NotAnArray.into();
        assert!(matches!(err, Error::Codec(_)));
        assert!(err.to_string().contains("recent jobs"));
    }

    #[test]
    fn test_from_image_error() {
        let err: Error = ImageError::Empty {
            path: PathBuf::from("/tmp/map.png"),
        }
        .into();
        assert!(err.to_string().contains("/tmp/map.png"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/widget_data.db",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::StoreQuery(_)));
        }
    }

    #[test]
    fn test_count_out_of_range_display() {
        let err = Error::CountOutOfRange {
            key: "map_active_count".to_string(),
            value: u64::MAX,
        };
        assert_eq!(
            err.to_string(),
            format!("map_active_count value {} is out of range", u64::MAX)
        );
    }

    #[test]
    fn test_unknown_widget_display() {
        let err = Error::UnknownWidget {
            name: "clock".to_string(),
        };
        assert_eq!(err.to_string(), "unknown widget kind: clock");
    }

    #[test]
    fn test_store_migration_error_display() {
        let err = Error::StoreMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "interval_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
