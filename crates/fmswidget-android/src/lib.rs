//! Android home-screen widgets for fmswidget
//!
//! Builds the `RemoteViews` updates the app's `AppWidgetProvider`s push to
//! the launcher. Views are recorded as plain values and replayed by the
//! Kotlin glue, so this crate builds and tests on any host.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod layout;
pub mod provider;
pub mod views;

pub use provider::{
    build_views, job_views, map_views, AppWidgetManager, JobWidgetProvider, MapWidgetProvider,
    RecordingWidgetManager, WidgetUpdate,
};
pub use views::{RemoteViews, ScaleType, ViewOp, Visibility};

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "Android"
}
