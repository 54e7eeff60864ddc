//! iOS home-screen widgets for fmswidget
//!
//! Builds WidgetKit timelines and SwiftUI-shaped view trees from the shared
//! store. The Swift extension reads the app group defaults through this
//! crate and turns [`view::View`] trees into real views.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod timeline;
pub mod view;
pub mod widgets;

pub use timeline::{ReloadPolicy, Timeline, TimelineProvider, WidgetEntry};
pub use view::{Modifier, Node, View};
pub use widgets::{
    bundle, entry_view, job_view, map_view, EntryView, WidgetDescriptor, WidgetFamily,
};

/// App group whose shared defaults hold the widget snapshot.
pub const APP_GROUP: &str = "group.com.querta.fms";

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "iOS"
}
