//! Recent-jobs payload codec.
//!
//! The `job_recent_list` key holds a JSON array of `{title, status, time}`
//! objects. Decoding is all-or-nothing: one bad element rejects the whole
//! payload. Renderers go through [`recent_jobs_or_empty`], which turns every
//! rejection into an empty list.

use thiserror::Error;
use tracing::warn;

use crate::error::Result;
use crate::snapshot::JobSummary;

/// Number of recent-job slots a tile can show.
pub const MAX_RECENT_SLOTS: usize = 3;

/// Payload assumed when the key is absent.
pub const EMPTY_LIST: &str = "[]";

/// Reasons a recent-jobs payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The payload is not JSON at all.
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    /// The payload is JSON but not an array.
    #[error("payload is not a JSON array")]
    NotAnArray,

    /// An array element is not a complete job summary.
    #[error("entry {index} is not a job summary: {reason}")]
    InvalidEntry {
        /// Position of the offending element.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Decode a recent-jobs payload.
///
/// Pure: the same input always gives the same output.
///
/// # Errors
///
/// Returns a [`CodecError`] if the payload is not JSON, is not an array, or
/// contains an element without string `title`, `status` and `time` fields.
pub fn decode_recent_jobs(payload: &str) -> std::result::Result<Vec<JobSummary>, CodecError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(CodecError::NotAnArray);
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|e| CodecError::InvalidEntry {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Decode a possibly absent payload, degrading any failure to an empty list.
#[must_use]
pub fn recent_jobs_or_empty(payload: Option<&str>) -> Vec<JobSummary> {
    match decode_recent_jobs(payload.unwrap_or(EMPTY_LIST)) {
        Ok(jobs) => jobs,
        Err(e) => {
            warn!(error = %e, "Discarding recent jobs payload");
            Vec::new()
        }
    }
}

/// Encode jobs for the `job_recent_list` key, in the given order.
///
/// No truncation happens here; renderers take the first
/// [`MAX_RECENT_SLOTS`] entries.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn encode_recent_jobs(jobs: &[JobSummary]) -> Result<String> {
    Ok(serde_json::to_string(jobs)?)
}

/// The prefix of `jobs` that fits in the tile's slots.
#[must_use]
pub fn visible_jobs(jobs: &[JobSummary]) -> &[JobSummary] {
    &jobs[..jobs.len().min(MAX_RECENT_SLOTS)]
}
