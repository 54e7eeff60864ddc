//! WidgetKit timeline provider.
//!
//! Both widgets share one provider. Every timeline holds a single entry
//! read from the app group store and asks to be reloaded once it has been
//! shown; the system decides when that happens.

use chrono::{DateTime, Utc};
use fmswidget::{
    ImageLoader, JobCounts, JobTile, JobWidgetRenderer, MapBackground, MapTile,
    MapWidgetRenderer, SnapshotStore,
};
use tracing::debug;

/// One timeline entry: everything either widget needs at `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    /// When the entry becomes current.
    pub date: DateTime<Utc>,
    /// Job widget content.
    pub job: JobTile,
    /// Map widget content.
    pub map: MapTile,
}

impl WidgetEntry {
    /// Counters shown by the job widget.
    #[must_use]
    pub fn counts(&self) -> JobCounts {
        self.job.counts
    }

    /// Active vehicles shown by the map badge.
    #[must_use]
    pub fn active_vehicles(&self) -> u64 {
        self.map.active_vehicles
    }
}

/// When WidgetKit should ask for the next timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// After the last entry has been displayed.
    AtEnd,
    /// No earlier than the given time.
    After(DateTime<Utc>),
}

/// Entries plus a reload policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// Entries in date order.
    pub entries: Vec<WidgetEntry>,
    /// Reload policy.
    pub policy: ReloadPolicy,
}

/// Builds entries from the shared store.
pub struct TimelineProvider<'a> {
    store: &'a dyn SnapshotStore,
    loader: &'a dyn ImageLoader,
}

impl std::fmt::Debug for TimelineProvider<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineProvider").finish_non_exhaustive()
    }
}

impl<'a> TimelineProvider<'a> {
    /// Create a provider over the app group store.
    #[must_use]
    pub fn new(store: &'a dyn SnapshotStore, loader: &'a dyn ImageLoader) -> Self {
        Self { store, loader }
    }

    /// Entry shown in the widget gallery before any data exists.
    ///
    /// All counters zero, no recent jobs, placeholder map. Never touches the
    /// store.
    #[must_use]
    pub fn placeholder(&self, now: DateTime<Utc>) -> WidgetEntry {
        WidgetEntry {
            date: now,
            job: JobTile::from_parts(JobCounts::default(), &[]),
            map: MapTile::new(0, MapBackground::Placeholder),
        }
    }

    /// Entry built from the current store contents.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> WidgetEntry {
        let job = JobWidgetRenderer::new(self.store).render();
        let map = MapWidgetRenderer::new(self.store, self.loader).render();
        debug!(date = %now, jobs = %job.counts, active = map.active_vehicles, "Built timeline entry");
        WidgetEntry {
            date: now,
            job,
            map,
        }
    }

    /// Single-entry timeline reloaded at its end.
    #[must_use]
    pub fn timeline(&self, now: DateTime<Utc>) -> Timeline {
        Timeline {
            entries: vec![self.snapshot(now)],
            policy: ReloadPolicy::AtEnd,
        }
    }

    /// Single-entry timeline that asks to reload after `interval`.
    #[must_use]
    pub fn timeline_reloading_after(
        &self,
        now: DateTime<Utc>,
        interval: std::time::Duration,
    ) -> Timeline {
        let next = chrono::Duration::from_std(interval)
            .ok()
            .and_then(|step| now.checked_add_signed(step));
        Timeline {
            entries: vec![self.snapshot(now)],
            policy: next.map_or(ReloadPolicy::AtEnd, ReloadPolicy::After),
        }
    }
}
