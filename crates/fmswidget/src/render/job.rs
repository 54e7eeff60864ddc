//! Job widget: three counters and up to three recent jobs.

use tracing::debug;

use crate::codec::MAX_RECENT_SLOTS;
use crate::deeplink::DeepLink;
use crate::snapshot::{JobCounts, JobSummary, WidgetSnapshot};
use crate::store::SnapshotStore;

/// Tile heading.
pub const TITLE: &str = "Job Overview";
/// Caption for the open counter.
pub const OPEN_CAPTION: &str = "Open";
/// Caption for the ongoing counter.
pub const ONGOING_CAPTION: &str = "Ongoing";
/// Caption for the complete counter.
pub const COMPLETE_CAPTION: &str = "Complete";
/// Heading above the recent-job slots.
pub const RECENT_JOBS_CAPTION: &str = "Recent Jobs";

/// One recent-job position on the tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSlot {
    /// Shown, with this job's title and status.
    Visible(JobSummary),
    /// Not shown.
    Hidden,
}

impl JobSlot {
    /// Whether the slot is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    /// The job in this slot, if shown.
    #[must_use]
    pub fn job(&self) -> Option<&JobSummary> {
        match self {
            Self::Visible(job) => Some(job),
            Self::Hidden => None,
        }
    }
}

/// What the job widget displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTile {
    /// Counters, each 0 when absent.
    pub counts: JobCounts,
    /// Exactly [`MAX_RECENT_SLOTS`] slots; slot `i` holds job `i` or is hidden.
    pub slots: [JobSlot; MAX_RECENT_SLOTS],
    /// Tile-wide tap target.
    pub link: DeepLink,
}

impl JobTile {
    /// Build a tile from counters and the decoded job list.
    ///
    /// Jobs beyond the slot count are dropped; missing jobs leave slots hidden.
    #[must_use]
    pub fn from_parts(counts: JobCounts, jobs: &[JobSummary]) -> Self {
        let slots = std::array::from_fn(|i| {
            jobs.get(i)
                .cloned()
                .map_or(JobSlot::Hidden, JobSlot::Visible)
        });
        Self {
            counts,
            slots,
            link: DeepLink::Job,
        }
    }

    /// Counters as `open/ongoing/complete`.
    #[must_use]
    pub fn counts_label(&self) -> String {
        self.counts.to_string()
    }

    /// Number of shown slots.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_visible()).count()
    }

    /// Jobs in shown slots, in slot order.
    pub fn visible_jobs(&self) -> impl Iterator<Item = &JobSummary> {
        self.slots.iter().filter_map(JobSlot::job)
    }

    /// Whether the "Recent Jobs" heading should be shown.
    #[must_use]
    pub fn shows_recent_section(&self) -> bool {
        self.visible_count() > 0
    }
}

/// Renders the job widget from an injected store.
pub struct JobWidgetRenderer<'a> {
    store: &'a dyn SnapshotStore,
}

impl std::fmt::Debug for JobWidgetRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobWidgetRenderer").finish_non_exhaustive()
    }
}

impl<'a> JobWidgetRenderer<'a> {
    /// Create a renderer reading from `store`.
    #[must_use]
    pub fn new(store: &'a dyn SnapshotStore) -> Self {
        Self { store }
    }

    /// Read the store and build the tile.
    ///
    /// Counters and the job list are read independently; a bad job list
    /// only empties the slots.
    #[must_use]
    pub fn render(&self) -> JobTile {
        let counts = WidgetSnapshot::read_job_counts(self.store);
        let jobs = WidgetSnapshot::read_recent_jobs(self.store);
        let tile = JobTile::from_parts(counts, &jobs);
        debug!(
            counts = %tile.counts,
            decoded = jobs.len(),
            visible = tile.visible_count(),
            "Rendered job tile"
        );
        tile
    }
}
