//! Interval-driven refresh host.
//!
//! On a device the OS decides when a widget refreshes. [`RefreshHost`] plays
//! that role off-device: every tick it renders both tiles from the store, as
//! two independent invocations, and reports whether the snapshot changed
//! since the previous tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::image::ImageLoader;
use crate::render::{JobTile, JobWidgetRenderer, MapTile, MapWidgetRenderer};
use crate::snapshot::WidgetSnapshot;
use crate::store::SnapshotStore;

/// Result of one refresh tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTick {
    /// 1-based tick counter.
    pub sequence: u64,
    /// Fingerprint of the snapshot observed on this tick.
    pub fingerprint: String,
    /// Whether the fingerprint differs from the previous tick's. Always true
    /// on the first tick.
    pub changed: bool,
    /// Rendered job tile.
    pub job: JobTile,
    /// Rendered map tile.
    pub map: MapTile,
}

/// Re-renders both widgets on a fixed interval until stopped.
#[derive(Debug)]
pub struct RefreshHost<S, L> {
    store: S,
    loader: L,
    period: Duration,
    running: Arc<AtomicBool>,
    stop_signal: Arc<Notify>,
    last_fingerprint: Option<String>,
    ticks: u64,
}

impl<S: SnapshotStore, L: ImageLoader> RefreshHost<S, L> {
    /// Create a host over `store`, ticking every `period`.
    #[must_use]
    pub fn new(store: S, loader: L, period: Duration) -> Self {
        Self {
            store,
            loader,
            period,
            running: Arc::new(AtomicBool::new(false)),
            stop_signal: Arc::new(Notify::new()),
            last_fingerprint: None,
            ticks: 0,
        }
    }

    /// Access the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check if the host loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get a handle that can stop the loop from another task.
    #[must_use]
    pub fn handle(&self) -> RefreshHandle {
        RefreshHandle {
            running: Arc::clone(&self.running),
            stop_signal: Arc::clone(&self.stop_signal),
        }
    }

    /// Perform one refresh: render both tiles and compare fingerprints.
    pub fn tick(&mut self) -> RefreshTick {
        self.ticks += 1;

        let snapshot = WidgetSnapshot::read(&self.store);
        let fingerprint = snapshot.fingerprint();
        let changed = self.last_fingerprint.as_deref() != Some(fingerprint.as_str());

        let job = JobWidgetRenderer::new(&self.store).render();
        let map = MapWidgetRenderer::new(&self.store, &self.loader).render();

        if changed {
            info!(
                tick = self.ticks,
                fingerprint = &fingerprint[..16],
                jobs = %job.counts,
                active = map.active_vehicles,
                "Widget snapshot changed"
            );
        } else {
            debug!(tick = self.ticks, "Widget snapshot unchanged");
        }
        self.last_fingerprint = Some(fingerprint.clone());

        RefreshTick {
            sequence: self.ticks,
            fingerprint,
            changed,
            job,
            map,
        }
    }

    /// Tick until stopped, passing each result to `on_tick`.
    ///
    /// The first tick fires immediately. Returns the number of ticks run.
    pub async fn run<F>(&mut self, mut on_tick: F) -> u64
    where
        F: FnMut(&RefreshTick),
    {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Refresh host already running");
            return 0;
        }

        debug!(
            interval_ms = self.period.as_millis(),
            "Starting refresh host"
        );

        let mut ticker = interval(self.period);
        let mut count = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = self.stop_signal.notified() => {}
            }
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let tick = self.tick();
            on_tick(&tick);
            count += 1;
        }

        self.running.store(false, Ordering::SeqCst);
        debug!(ticks = count, "Refresh host stopped");
        count
    }
}

/// A handle to stop a running [`RefreshHost`].
///
/// Cloneable and sendable to other tasks.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    running: Arc<AtomicBool>,
    stop_signal: Arc<Notify>,
}

impl RefreshHandle {
    /// Stop the associated host. Takes effect before its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stop_signal.notify_one();
    }

    /// Check if the host is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::FsImageLoader;
    use crate::publish::SnapshotPublisher;
    use crate::snapshot::JobCounts;
    use crate::store::{keys, MemoryStore};

    fn host(store: MemoryStore) -> RefreshHost<MemoryStore, FsImageLoader> {
        RefreshHost::new(store, FsImageLoader::new(), Duration::from_millis(10))
    }

    #[test]
    fn test_first_tick_is_changed() {
        let mut host = host(MemoryStore::new());
        let tick = host.tick();
        assert_eq!(tick.sequence, 1);
        assert!(tick.changed);
        assert_eq!(tick.job.counts_label(), "0/0/0");
        assert_eq!(tick.map.badge, "Active: 0");
    }

    #[test]
    fn test_unchanged_store_not_changed() {
        let mut host = host(MemoryStore::new().with_int(keys::JOB_OPEN_COUNT, 1));
        let first = host.tick();
        let second = host.tick();
        assert!(!second.changed);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(second.sequence, 2);
    }

    #[test]
    fn test_write_between_ticks_detected() {
        let mut host = host(MemoryStore::new());
        host.tick();

        SnapshotPublisher::new(host.store())
            .set_job_counts(JobCounts::new(2, 1, 5))
            .unwrap();

        let tick = host.tick();
        assert!(tick.changed);
        assert_eq!(tick.job.counts_label(), "2/1/5");
    }

    #[test]
    fn test_handle_not_running_before_start() {
        let host = host(MemoryStore::new());
        assert!(!host.is_running());
        assert!(!host.handle().is_running());
    }

    #[tokio::test]
    async fn test_run_until_stopped() {
        let mut host = host(MemoryStore::new().with_int(keys::MAP_ACTIVE_COUNT, 4));
        let handle = host.handle();

        let mut seen = Vec::new();
        let count = host
            .run(|tick| {
                seen.push(tick.map.badge.clone());
                if tick.sequence == 3 {
                    handle.stop();
                }
            })
            .await;

        assert_eq!(count, 3);
        assert_eq!(seen, vec!["Active: 4"; 3]);
        assert!(!host.is_running());
    }

    #[tokio::test]
    async fn test_stop_from_other_task() {
        let mut host = RefreshHost::new(
            MemoryStore::new(),
            FsImageLoader::new(),
            Duration::from_secs(3600),
        );
        let handle = host.handle();

        let task = tokio::spawn(async move { host.run(|_| {}).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_running());
        handle.stop();

        let count = task.await.unwrap();
        // Only the immediate first tick fires within an hour-long period
        assert_eq!(count, 1);
    }
}
