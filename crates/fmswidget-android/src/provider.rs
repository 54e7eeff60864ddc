//! `AppWidgetProvider` equivalents for the job and map widgets.
//!
//! The launcher calls `onUpdate` with every placed instance of a widget.
//! Each instance gets its own freshly built [`RemoteViews`], read from the
//! store at that moment.

use fmswidget::{
    ImageLoader, JobTile, JobWidgetRenderer, MapBackground, MapTile, MapWidgetRenderer,
    SnapshotStore, WidgetKind,
};
use serde::Serialize;
use tracing::debug;

use crate::layout::{
    ACTIVE_COUNT, COMPLETE_COUNT, JOB_LAYOUT, JOB_ROOT, JOB_SLOTS, MAP_LAYOUT,
    MAP_PLACEHOLDER_DRAWABLE, MAP_ROOT, MAP_SNAPSHOT, ONGOING_COUNT, OPEN_COUNT,
};
use crate::views::{RemoteViews, ScaleType, Visibility};

/// Receives finished updates, like `AppWidgetManager.updateAppWidget`.
pub trait AppWidgetManager {
    /// Replace the views of one widget instance.
    fn update_app_widget(&mut self, widget_id: i32, views: RemoteViews);
}

/// Views pushed to one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetUpdate {
    /// Launcher-assigned instance id.
    pub widget_id: i32,
    /// Views for that instance.
    pub views: RemoteViews,
}

/// An [`AppWidgetManager`] that keeps every update it receives.
#[derive(Debug, Default)]
pub struct RecordingWidgetManager {
    updates: Vec<WidgetUpdate>,
}

impl RecordingWidgetManager {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates received so far, oldest first.
    #[must_use]
    pub fn updates(&self) -> &[WidgetUpdate] {
        &self.updates
    }

    /// Take the recorded updates.
    #[must_use]
    pub fn into_updates(self) -> Vec<WidgetUpdate> {
        self.updates
    }
}

impl AppWidgetManager for RecordingWidgetManager {
    fn update_app_widget(&mut self, widget_id: i32, views: RemoteViews) {
        self.updates.push(WidgetUpdate { widget_id, views });
    }
}

/// Translate a job tile into views for [`JOB_LAYOUT`].
#[must_use]
pub fn job_views(tile: &JobTile) -> RemoteViews {
    let mut views = RemoteViews::new(JOB_LAYOUT);
    views.set_on_click_deep_link(JOB_ROOT, tile.link);

    views.set_text_view_text(OPEN_COUNT, tile.counts.open.to_string());
    views.set_text_view_text(ONGOING_COUNT, tile.counts.ongoing.to_string());
    views.set_text_view_text(COMPLETE_COUNT, tile.counts.complete.to_string());

    for (ids, slot) in JOB_SLOTS.iter().zip(&tile.slots) {
        match slot.job() {
            Some(job) => {
                views.set_view_visibility(ids.item, Visibility::Visible);
                views.set_text_view_text(ids.title, job.title.as_str());
                views.set_text_view_text(ids.status, job.status.as_str());
            }
            None => views.set_view_visibility(ids.item, Visibility::Gone),
        }
    }

    views
}

/// Translate a map tile into views for [`MAP_LAYOUT`].
#[must_use]
pub fn map_views(tile: &MapTile) -> RemoteViews {
    let mut views = RemoteViews::new(MAP_LAYOUT);
    views.set_on_click_deep_link(MAP_ROOT, tile.link);
    views.set_text_view_text(ACTIVE_COUNT, tile.badge.as_str());

    match &tile.background {
        MapBackground::Image(image) => views.set_image_view_bitmap(MAP_SNAPSHOT, image),
        MapBackground::Placeholder => {
            views.set_image_view_resource(MAP_SNAPSHOT, MAP_PLACEHOLDER_DRAWABLE, ScaleType::Center);
        }
    }

    views
}

/// Job widget provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobWidgetProvider;

impl JobWidgetProvider {
    /// Build views for the current store contents.
    #[must_use]
    pub fn build_views(&self, store: &dyn SnapshotStore) -> RemoteViews {
        job_views(&JobWidgetRenderer::new(store).render())
    }

    /// Handle an update broadcast for `widget_ids`.
    pub fn on_update(
        &self,
        manager: &mut dyn AppWidgetManager,
        widget_ids: &[i32],
        store: &dyn SnapshotStore,
    ) {
        debug!(count = widget_ids.len(), "Updating job widgets");
        for &widget_id in widget_ids {
            manager.update_app_widget(widget_id, self.build_views(store));
        }
    }
}

/// Map widget provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapWidgetProvider;

impl MapWidgetProvider {
    /// Build views for the current store contents.
    #[must_use]
    pub fn build_views(&self, store: &dyn SnapshotStore, loader: &dyn ImageLoader) -> RemoteViews {
        map_views(&MapWidgetRenderer::new(store, loader).render())
    }

    /// Handle an update broadcast for `widget_ids`.
    pub fn on_update(
        &self,
        manager: &mut dyn AppWidgetManager,
        widget_ids: &[i32],
        store: &dyn SnapshotStore,
        loader: &dyn ImageLoader,
    ) {
        debug!(count = widget_ids.len(), "Updating map widgets");
        for &widget_id in widget_ids {
            manager.update_app_widget(widget_id, self.build_views(store, loader));
        }
    }
}

/// Build views for either widget.
#[must_use]
pub fn build_views(
    kind: WidgetKind,
    store: &dyn SnapshotStore,
    loader: &dyn ImageLoader,
) -> RemoteViews {
    match kind {
        WidgetKind::Job => JobWidgetProvider.build_views(store),
        WidgetKind::Map => MapWidgetProvider.build_views(store, loader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ViewOp;
    use fmswidget::store::keys;
    use fmswidget::{FsImageLoader, ImageFormat, MemoryStore};

    /// 1x1 RGBA PNG.
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\
        \x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x06\x00\x00\x00\x1f\x15\xc4\x89\
        \x00\x00\x00\x0bIDAT\x78\x9c\x63\x60\x00\x02\x00\x00\x05\x00\x01\x7a\x5e\xab\x3f\
        \x00\x00\x00\x00IEND\xae\x42\x60\x82";

    fn recent(n: usize) -> String {
        let rows: Vec<String> = (1..=n)
            .map(|i| format!(r#"{{"title":"J{i}","status":"s{i}","time":"t{i}"}}"#))
            .collect();
        format!("[{}]", rows.join(","))
    }

    #[test]
    fn test_job_views_full_snapshot() {
        let store = MemoryStore::new()
            .with_int(keys::JOB_OPEN_COUNT, 5)
            .with_int(keys::JOB_ONGOING_COUNT, 2)
            .with_int(keys::JOB_COMPLETE_COUNT, 9)
            .with_string(
                keys::JOB_RECENT_LIST,
                r#"[{"title":"Pump repair","status":"Ongoing","time":"09:00"},{"title":"Fence","status":"Open","time":"10:30"}]"#,
            );

        let views = JobWidgetProvider.build_views(&store);

        assert_eq!(views.layout, JOB_LAYOUT);
        assert_eq!(views.click_uri_of(JOB_ROOT), Some("fms://job"));
        assert_eq!(views.text_of(OPEN_COUNT), Some("5"));
        assert_eq!(views.text_of(ONGOING_COUNT), Some("2"));
        assert_eq!(views.text_of(COMPLETE_COUNT), Some("9"));

        assert_eq!(views.visibility_of("job_item_1"), Some(Visibility::Visible));
        assert_eq!(views.text_of("tv_job_title_1"), Some("Pump repair"));
        assert_eq!(views.text_of("tv_job_status_1"), Some("Ongoing"));
        assert_eq!(views.visibility_of("job_item_2"), Some(Visibility::Visible));
        assert_eq!(views.text_of("tv_job_title_2"), Some("Fence"));
        assert_eq!(views.visibility_of("job_item_3"), Some(Visibility::Gone));
        assert_eq!(views.text_of("tv_job_title_3"), None);
    }

    #[test]
    fn test_job_views_empty_store() {
        let views = JobWidgetProvider.build_views(&MemoryStore::new());

        assert_eq!(views.text_of(OPEN_COUNT), Some("0"));
        assert_eq!(views.text_of(ONGOING_COUNT), Some("0"));
        assert_eq!(views.text_of(COMPLETE_COUNT), Some("0"));
        for ids in JOB_SLOTS {
            assert_eq!(views.visibility_of(ids.item), Some(Visibility::Gone));
        }
    }

    #[test]
    fn test_job_views_malformed_list_hides_all_rows() {
        let store = MemoryStore::new()
            .with_int(keys::JOB_OPEN_COUNT, 1)
            .with_string(keys::JOB_RECENT_LIST, "{not json");

        let views = JobWidgetProvider.build_views(&store);
        assert_eq!(views.text_of(OPEN_COUNT), Some("1"));
        for ids in JOB_SLOTS {
            assert_eq!(views.visibility_of(ids.item), Some(Visibility::Gone));
        }
    }

    #[test]
    fn test_job_views_visible_rows_track_list_length() {
        for n in 0..=5 {
            let store = MemoryStore::new().with_string(keys::JOB_RECENT_LIST, &recent(n));
            let views = JobWidgetProvider.build_views(&store);

            let visible = JOB_SLOTS
                .iter()
                .filter(|ids| views.visibility_of(ids.item) == Some(Visibility::Visible))
                .count();
            assert_eq!(visible, n.min(3), "list of {n}");
        }
    }

    #[test]
    fn test_map_views_placeholder() {
        let store = MemoryStore::new().with_int(keys::MAP_ACTIVE_COUNT, 7);
        let views = MapWidgetProvider.build_views(&store, &FsImageLoader::new());

        assert_eq!(views.layout, MAP_LAYOUT);
        assert_eq!(views.click_uri_of(MAP_ROOT), Some("fms://map"));
        assert_eq!(views.text_of(ACTIVE_COUNT), Some("Active: 7"));

        let ops: Vec<_> = views.ops_for(MAP_SNAPSHOT).collect();
        assert_eq!(
            ops,
            vec![&ViewOp::SetImageResource {
                view_id: MAP_SNAPSHOT,
                resource: MAP_PLACEHOLDER_DRAWABLE,
                scale: ScaleType::Center,
            }]
        );
    }

    #[test]
    fn test_map_views_missing_file_is_placeholder() {
        let store = MemoryStore::new().with_string(keys::MAP_IMAGE_PATH, "/nonexistent/map.png");
        let views = MapWidgetProvider.build_views(&store, &FsImageLoader::new());

        assert_eq!(views.text_of(ACTIVE_COUNT), Some("Active: 0"));
        assert!(matches!(
            views.ops_for(MAP_SNAPSHOT).next(),
            Some(ViewOp::SetImageResource { .. })
        ));
    }

    #[test]
    fn test_map_views_truncated_png_is_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, &PNG[..PNG.len() - 20]).unwrap();

        let store = MemoryStore::new()
            .with_int(keys::MAP_ACTIVE_COUNT, 6)
            .with_string(keys::MAP_IMAGE_PATH, path.to_str().unwrap());
        let views = MapWidgetProvider.build_views(&store, &FsImageLoader::new());

        assert_eq!(views.text_of(ACTIVE_COUNT), Some("Active: 6"));
        assert!(matches!(
            views.ops_for(MAP_SNAPSHOT).next(),
            Some(ViewOp::SetImageResource { .. })
        ));
    }

    #[test]
    fn test_map_views_loaded_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, PNG).unwrap();

        let store = MemoryStore::new()
            .with_int(keys::MAP_ACTIVE_COUNT, 3)
            .with_string(keys::MAP_IMAGE_PATH, path.to_str().unwrap());
        let views = MapWidgetProvider.build_views(&store, &FsImageLoader::new());

        match views.ops_for(MAP_SNAPSHOT).next() {
            Some(ViewOp::SetImageBitmap {
                source,
                format,
                scale,
                bytes,
                ..
            }) => {
                assert_eq!(source, &path);
                assert_eq!(*format, ImageFormat::Png);
                assert_eq!(*scale, ScaleType::CenterCrop);
                assert_eq!(bytes.as_slice(), PNG);
            }
            other => panic!("expected bitmap, got {other:?}"),
        }
        assert_eq!(views.text_of(ACTIVE_COUNT), Some("Active: 3"));
    }

    #[test]
    fn test_on_update_builds_one_update_per_instance() {
        let store = MemoryStore::new().with_int(keys::JOB_OPEN_COUNT, 4);
        let mut manager = RecordingWidgetManager::new();

        JobWidgetProvider.on_update(&mut manager, &[11, 12, 13], &store);

        let updates = manager.into_updates();
        assert_eq!(
            updates.iter().map(|u| u.widget_id).collect::<Vec<_>>(),
            vec![11, 12, 13]
        );
        assert!(updates
            .iter()
            .all(|u| u.views.text_of(OPEN_COUNT) == Some("4")));
    }

    #[test]
    fn test_on_update_with_no_instances() {
        let mut manager = RecordingWidgetManager::new();
        MapWidgetProvider.on_update(
            &mut manager,
            &[],
            &MemoryStore::new(),
            &FsImageLoader::new(),
        );
        assert!(manager.updates().is_empty());
    }

    #[test]
    fn test_build_views_dispatch() {
        let store = MemoryStore::new();
        let loader = FsImageLoader::new();
        assert_eq!(build_views(WidgetKind::Job, &store, &loader).layout, JOB_LAYOUT);
        assert_eq!(build_views(WidgetKind::Map, &store, &loader).layout, MAP_LAYOUT);
    }
}
