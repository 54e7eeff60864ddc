//! The widget snapshot schema.
//!
//! A snapshot is whatever the application last wrote into the shared store.
//! It carries no version or timestamp, and each field is read independently,
//! so a reader racing a writer may see old counters next to a new job list.
//! The next refresh tick corrects that.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec;
use crate::store::{keys, SnapshotStore};

/// One entry of the recent-jobs list.
///
/// There is no persistent identifier; two entries may share a title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSummary {
    /// Display title of the job.
    pub title: String,
    /// Human-readable job status (e.g. "Ongoing").
    pub status: String,
    /// Time label supplied by the application. Decoded and kept, not rendered
    /// by every platform.
    pub time: String,
}

impl JobSummary {
    /// Create a new job summary.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            time: time.into(),
        }
    }

    /// Identity used for list rows: title followed by time.
    ///
    /// Only meaningful within one render; not a storage key.
    #[must_use]
    pub fn row_id(&self) -> String {
        format!("{}{}", self.title, self.time)
    }
}

/// The three job counters shown on the job tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobCounts {
    /// Open jobs.
    pub open: u64,
    /// Jobs in progress.
    pub ongoing: u64,
    /// Completed jobs.
    pub complete: u64,
}

impl JobCounts {
    /// Create a new set of counters.
    #[must_use]
    pub fn new(open: u64, ongoing: u64, complete: u64) -> Self {
        Self {
            open,
            ongoing,
            complete,
        }
    }
}

impl fmt::Display for JobCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.open, self.ongoing, self.complete)
    }
}

/// The complete set of widget-relevant fields, as read by a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    /// Job counters.
    pub jobs: JobCounts,
    /// Recent jobs in the order the application stored them.
    pub recent_jobs: Vec<JobSummary>,
    /// Number of currently active vehicles.
    pub map_active_vehicle_count: u64,
    /// Path of the last rendered map image, if any. The file may be gone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_image_path: Option<PathBuf>,
}

impl WidgetSnapshot {
    /// Read every snapshot field from the store.
    ///
    /// Missing keys take their defaults and a malformed job list reads as
    /// empty, so this never fails.
    #[must_use]
    pub fn read(store: &dyn SnapshotStore) -> Self {
        Self {
            jobs: Self::read_job_counts(store),
            recent_jobs: Self::read_recent_jobs(store),
            map_active_vehicle_count: Self::read_map_active_count(store),
            map_image_path: Self::read_map_image_path(store),
        }
    }

    /// Read the three job counters, each defaulting to 0.
    #[must_use]
    pub fn read_job_counts(store: &dyn SnapshotStore) -> JobCounts {
        JobCounts {
            open: read_count(store, keys::JOB_OPEN_COUNT),
            ongoing: read_count(store, keys::JOB_ONGOING_COUNT),
            complete: read_count(store, keys::JOB_COMPLETE_COUNT),
        }
    }

    /// Read and decode the recent-jobs list, falling back to empty.
    #[must_use]
    pub fn read_recent_jobs(store: &dyn SnapshotStore) -> Vec<JobSummary> {
        let payload = store.get_string(keys::JOB_RECENT_LIST, Some(codec::EMPTY_LIST));
        codec::recent_jobs_or_empty(payload.as_deref())
    }

    /// Read the active vehicle counter, defaulting to 0.
    #[must_use]
    pub fn read_map_active_count(store: &dyn SnapshotStore) -> u64 {
        read_count(store, keys::MAP_ACTIVE_COUNT)
    }

    /// Read the map image path. An empty string counts as absent.
    #[must_use]
    pub fn read_map_image_path(store: &dyn SnapshotStore) -> Option<PathBuf> {
        store
            .get_string(keys::MAP_IMAGE_PATH, None)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// BLAKE3 digest of the snapshot contents.
    ///
    /// Used to notice that the store changed between refresh ticks. It is
    /// never written back to the store.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for counter in [
            self.jobs.open,
            self.jobs.ongoing,
            self.jobs.complete,
            self.map_active_vehicle_count,
        ] {
            hasher.update(&counter.to_le_bytes());
        }
        for job in &self.recent_jobs {
            for field in [&job.title, &job.status, &job.time] {
                let len = u64::try_from(field.len()).unwrap_or(u64::MAX);
                hasher.update(&len.to_le_bytes());
                hasher.update(field.as_bytes());
            }
        }
        match &self.map_image_path {
            Some(path) => {
                hasher.update(&[1]);
                hasher.update(path.as_os_str().as_encoded_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Read a non-negative counter. Negative values are outside the contract.
fn read_count(store: &dyn SnapshotStore, key: &str) -> u64 {
    let raw = store.get_int(key, 0);
    u64::try_from(raw).unwrap_or_else(|_| {
        warn!(key, value = raw, "Negative counter in widget store, reading as 0");
        0
    })
}
