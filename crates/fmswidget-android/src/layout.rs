//! Layout and view identifiers from the app's `res/layout` resources.

use fmswidget::MAX_RECENT_SLOTS;

/// Job widget layout.
pub const JOB_LAYOUT: &str = "widget_job";
/// Map widget layout.
pub const MAP_LAYOUT: &str = "widget_map";

/// Root of the job widget; carries the tap target.
pub const JOB_ROOT: &str = "widget_job_root";
/// Open counter text.
pub const OPEN_COUNT: &str = "tv_open_count";
/// Ongoing counter text.
pub const ONGOING_COUNT: &str = "tv_ongoing_count";
/// Complete counter text.
pub const COMPLETE_COUNT: &str = "tv_complete_count";

/// Row container, title and status view for each recent-job slot.
pub const JOB_SLOTS: [JobSlotIds; MAX_RECENT_SLOTS] = [
    JobSlotIds {
        item: "job_item_1",
        title: "tv_job_title_1",
        status: "tv_job_status_1",
    },
    JobSlotIds {
        item: "job_item_2",
        title: "tv_job_title_2",
        status: "tv_job_status_2",
    },
    JobSlotIds {
        item: "job_item_3",
        title: "tv_job_title_3",
        status: "tv_job_status_3",
    },
];

/// Root of the map widget; carries the tap target.
pub const MAP_ROOT: &str = "widget_map_root";
/// Active vehicle badge text.
pub const ACTIVE_COUNT: &str = "tv_active_count";
/// Map background image.
pub const MAP_SNAPSHOT: &str = "iv_map_snapshot";
/// Drawable shown when no map image can be loaded.
pub const MAP_PLACEHOLDER_DRAWABLE: &str = "ic_map_placeholder";

/// View ids for one recent-job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSlotIds {
    /// Row container.
    pub item: &'static str,
    /// Title text.
    pub title: &'static str,
    /// Status text.
    pub status: &'static str,
}
