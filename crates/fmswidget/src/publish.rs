//! Application-side writes into the shared store.
//!
//! Renderers never write. Everything that changes widget state goes through a
//! [`SnapshotPublisher`], either wholesale with [`SnapshotPublisher::publish`]
//! or one field at a time.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{Error, Result};
use crate::image::ImageFormat;
use crate::snapshot::{JobCounts, JobSummary, WidgetSnapshot};
use crate::store::{keys, SnapshotWriter};

/// Base name of the map image file written by [`SnapshotPublisher::store_map_image`].
pub const MAP_IMAGE_FILE_STEM: &str = "map_snapshot";

/// Writes snapshot fields through a [`SnapshotWriter`].
#[derive(Debug)]
pub struct SnapshotPublisher<'a, W: SnapshotWriter + ?Sized> {
    writer: &'a W,
}

impl<'a, W: SnapshotWriter + ?Sized> SnapshotPublisher<'a, W> {
    /// Create a publisher over the given writer.
    #[must_use]
    pub fn new(writer: &'a W) -> Self {
        Self { writer }
    }

    /// Write every field of `snapshot`.
    ///
    /// An absent image path removes the key. Fields are written one by one,
    /// so a concurrent reader may see a mix of old and new values.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails or the job list cannot be encoded.
    pub fn publish(&self, snapshot: &WidgetSnapshot) -> Result<()> {
        self.set_job_counts(snapshot.jobs)?;
        self.set_recent_jobs(&snapshot.recent_jobs)?;
        self.set_map_active_count(snapshot.map_active_vehicle_count)?;
        self.set_map_image_path(snapshot.map_image_path.as_deref())?;
        info!(
            jobs = %snapshot.jobs,
            recent = snapshot.recent_jobs.len(),
            active = snapshot.map_active_vehicle_count,
            "Published widget snapshot"
        );
        Ok(())
    }

    /// Write the three job counters.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn set_job_counts(&self, counts: JobCounts) -> Result<()> {
        self.put_count(keys::JOB_OPEN_COUNT, counts.open)?;
        self.put_count(keys::JOB_ONGOING_COUNT, counts.ongoing)?;
        self.put_count(keys::JOB_COMPLETE_COUNT, counts.complete)
    }

    /// Write the recent-jobs list in the given order. Not truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn set_recent_jobs(&self, jobs: &[JobSummary]) -> Result<()> {
        let payload = codec::encode_recent_jobs(jobs)?;
        self.writer.put_string(keys::JOB_RECENT_LIST, &payload)
    }

    /// Write the active vehicle counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_map_active_count(&self, count: u64) -> Result<()> {
        self.put_count(keys::MAP_ACTIVE_COUNT, count)
    }

    /// Point the map tile at an image file, or clear it with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the path is not valid UTF-8.
    pub fn set_map_image_path(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let text = path.to_str().ok_or_else(|| {
                    Error::internal(format!("map image path is not UTF-8: {}", path.display()))
                })?;
                self.writer.put_string(keys::MAP_IMAGE_PATH, text)
            }
            None => self.writer.remove(keys::MAP_IMAGE_PATH),
        }
    }

    /// Save rendered map image bytes under `dir` and store the file's
    /// absolute path.
    ///
    /// The file is written to a temporary name and renamed into place, so a
    /// renderer never loads a half-written image. A snapshot left over from a
    /// previous format is removed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode as an image, the file
    /// cannot be written, or the store write fails.
    pub fn store_map_image(&self, dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
        let format = crate::image::verify(&dir.join(MAP_IMAGE_FILE_STEM), bytes)?;

        std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })?;
        let dir = dir.canonicalize()?;

        let target = dir.join(format!("{MAP_IMAGE_FILE_STEM}.{}", format.extension()));
        let staging = dir.join(format!(".{MAP_IMAGE_FILE_STEM}.tmp"));
        std::fs::write(&staging, bytes)?;
        std::fs::rename(&staging, &target)?;
        debug!(path = %target.display(), %format, "Wrote map image");

        self.set_map_image_path(Some(&target))?;
        remove_stale_images(&dir, format);
        Ok(target)
    }

    fn put_count(&self, key: &str, value: u64) -> Result<()> {
        let stored = i64::try_from(value).map_err(|_| Error::CountOutOfRange {
            key: key.to_string(),
            value,
        })?;
        self.writer.put_int(key, stored)
    }
}

/// Delete `map_snapshot.*` files of every format except `current`.
fn remove_stale_images(dir: &Path, current: ImageFormat) {
    for format in ImageFormat::ALL.into_iter().filter(|f| *f != current) {
        let stale = dir.join(format!("{MAP_IMAGE_FILE_STEM}.{}", format.extension()));
        match std::fs::remove_file(&stale) {
            Ok(()) => debug!(path = %stale.display(), "Removed stale map image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %stale.display(), error = %e, "Failed to remove stale map image");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{PNG_1X1, PNG_CORRUPT};
    use crate::store::{MemoryStore, SnapshotStore, SqliteStore};

    fn sample_snapshot() -> WidgetSnapshot {
        WidgetSnapshot {
            jobs: JobCounts::new(2, 1, 5),
            recent_jobs: vec![
                JobSummary::new("Delivery A", "Ongoing", "10:00"),
                JobSummary::new("Pickup B", "Open", "11:30"),
            ],
            map_active_vehicle_count: 7,
            map_image_path: Some(PathBuf::from("/data/map.png")),
        }
    }

    #[test]
    fn test_publish_then_read() {
        let store = MemoryStore::new();
        let snapshot = sample_snapshot();
        SnapshotPublisher::new(&store).publish(&snapshot).unwrap();

        assert_eq!(WidgetSnapshot::read(&store), snapshot);
    }

    #[test]
    fn test_publish_to_sqlite_then_read() {
        let store = SqliteStore::open_in_memory().unwrap();
        let snapshot = sample_snapshot();
        SnapshotPublisher::new(&store).publish(&snapshot).unwrap();

        assert_eq!(WidgetSnapshot::read(&store), snapshot);
    }

    #[test]
    fn test_publish_without_image_clears_path() {
        let store = MemoryStore::new().with_string(keys::MAP_IMAGE_PATH, "/old/map.png");
        let snapshot = WidgetSnapshot {
            map_image_path: None,
            ..sample_snapshot()
        };
        SnapshotPublisher::new(&store).publish(&snapshot).unwrap();

        assert_eq!(store.get_string(keys::MAP_IMAGE_PATH, None), None);
    }

    #[test]
    fn test_field_by_field_updates() {
        let store = MemoryStore::new();
        let publisher = SnapshotPublisher::new(&store);
        publisher.set_job_counts(JobCounts::new(1, 0, 0)).unwrap();
        publisher.set_map_active_count(3).unwrap();

        assert_eq!(store.get_int(keys::JOB_OPEN_COUNT, -1), 1);
        assert_eq!(store.get_int(keys::JOB_ONGOING_COUNT, -1), 0);
        assert_eq!(store.get_int(keys::MAP_ACTIVE_COUNT, -1), 3);
        assert_eq!(store.get_string(keys::JOB_RECENT_LIST, None), None);
    }

    #[test]
    fn test_recent_jobs_not_truncated_at_write() {
        let store = MemoryStore::new();
        let jobs: Vec<_> = (0..6)
            .map(|i| JobSummary::new(format!("Job {i}"), "Open", "08:00"))
            .collect();
        SnapshotPublisher::new(&store).set_recent_jobs(&jobs).unwrap();

        assert_eq!(WidgetSnapshot::read_recent_jobs(&store).len(), 6);
    }

    #[test]
    fn test_store_map_image_writes_file_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();

        let path = SnapshotPublisher::new(&store)
            .store_map_image(&dir.path().join("widgets"), PNG_1X1)
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&path).unwrap(), PNG_1X1);
        assert_eq!(WidgetSnapshot::read_map_image_path(&store), Some(path));
    }

    #[test]
    fn test_store_map_image_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();

        let err = SnapshotPublisher::new(&store)
            .store_map_image(dir.path(), b"plain text")
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_map_image_rejects_corrupt_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();

        let err = SnapshotPublisher::new(&store)
            .store_map_image(dir.path(), PNG_CORRUPT)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Image(crate::image::ImageError::Corrupt { .. })
        ));
        assert!(store.is_empty());
        assert!(!dir.path().join("map_snapshot.png").exists());
    }

    #[test]
    fn test_store_map_image_removes_previous_format() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("map_snapshot.jpg");
        std::fs::write(&old, b"old snapshot").unwrap();
        let store = MemoryStore::new();

        let path = SnapshotPublisher::new(&store)
            .store_map_image(dir.path(), PNG_1X1)
            .unwrap();

        assert!(path.exists());
        assert!(!old.exists());
        assert!(!dir.path().join(".map_snapshot.tmp").exists());
    }

    #[test]
    fn test_count_out_of_range_rejected() {
        let store = MemoryStore::new();
        let publisher = SnapshotPublisher::new(&store);

        let err = publisher.set_map_active_count(u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::CountOutOfRange { ref key, value } if key == keys::MAP_ACTIVE_COUNT && value == u64::MAX
        ));
        assert!(store.is_empty());

        publisher
            .set_map_active_count(i64::MAX.unsigned_abs())
            .unwrap();
        assert_eq!(store.get_int(keys::MAP_ACTIVE_COUNT, 0), i64::MAX);
    }
}
