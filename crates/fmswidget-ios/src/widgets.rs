//! Entry views and widget configuration for the job and map widgets.

use fmswidget::render::job::{
    COMPLETE_CAPTION, ONGOING_CAPTION, OPEN_CAPTION, RECENT_JOBS_CAPTION, TITLE,
};
use fmswidget::{DeepLink, JobTile, MapBackground, MapTile, WidgetKind};
use serde::Serialize;

use crate::timeline::WidgetEntry;
use crate::view::{
    Alignment, BaseColor, Color, ContentMode, Edges, Font, ImageSource, Modifier, View, Weight,
};

/// SF Symbol drawn over the placeholder fill.
pub const PLACEHOLDER_SYMBOL: &str = "map.fill";
/// Side length of the placeholder symbol, in points.
pub const PLACEHOLDER_SYMBOL_SIZE: u16 = 40;
/// Placeholder background fill.
pub const PLACEHOLDER_FILL: Color = Color::new(BaseColor::Gray, 20);
/// Badge background.
pub const BADGE_BACKGROUND: Color = Color::new(BaseColor::White, 80);

/// Sizes a widget can be placed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetFamily {
    /// `.systemSmall`
    SystemSmall,
    /// `.systemMedium`
    SystemMedium,
}

/// A `StaticConfiguration` for one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDescriptor {
    /// Widget kind string used to reload timelines.
    pub kind: &'static str,
    /// Name shown in the widget gallery.
    pub display_name: &'static str,
    /// Gallery description.
    pub description: &'static str,
    /// Supported sizes.
    pub families: &'static [WidgetFamily],
}

const FAMILIES: &[WidgetFamily] = &[WidgetFamily::SystemSmall, WidgetFamily::SystemMedium];

impl WidgetDescriptor {
    /// Job widget configuration.
    pub const JOB: Self = Self {
        kind: "JobWidget",
        display_name: "Job Overview",
        description: "View summary of your jobs.",
        families: FAMILIES,
    };

    /// Map widget configuration.
    pub const MAP: Self = Self {
        kind: "MapWidget",
        display_name: "Fleet Map",
        description: "View active fleet status.",
        families: FAMILIES,
    };

    /// Configuration for `kind`.
    #[must_use]
    pub fn for_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Job => Self::JOB,
            WidgetKind::Map => Self::MAP,
        }
    }
}

/// The widget bundle, in registration order.
#[must_use]
pub fn bundle() -> [WidgetDescriptor; 2] {
    WidgetKind::ALL.map(WidgetDescriptor::for_kind)
}

/// A widget body and its tap URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    /// Root view.
    pub body: View,
    /// `.widgetURL(_)`
    pub widget_url: String,
}

impl EntryView {
    fn new(body: View, link: DeepLink) -> Self {
        Self {
            body,
            widget_url: link.uri(),
        }
    }
}

fn counter(caption: &str, value: u64) -> View {
    View::vstack(
        Alignment::Center,
        vec![
            View::text(caption)
                .font(Font::Caption)
                .foreground_color(Color::GRAY),
            View::text(value.to_string())
                .font(Font::Title2)
                .font_weight(Weight::Bold),
        ],
    )
    .modifier(Modifier::MaxWidth)
}

/// Job widget body for a rendered tile.
#[must_use]
pub fn job_view(tile: &JobTile) -> EntryView {
    let mut rows = vec![
        View::text(TITLE)
            .font(Font::Headline)
            .padding(Edges::Bottom, Some(4)),
        View::hstack(vec![
            counter(OPEN_CAPTION, tile.counts.open),
            counter(ONGOING_CAPTION, tile.counts.ongoing),
            counter(COMPLETE_CAPTION, tile.counts.complete),
        ]),
    ];

    if tile.shows_recent_section() {
        rows.push(
            View::text(RECENT_JOBS_CAPTION)
                .font(Font::Subheadline)
                .font_weight(Weight::Semibold)
                .padding(Edges::Top, Some(8)),
        );
        rows.extend(tile.visible_jobs().map(|job| {
            View::hstack(vec![
                View::text(job.title.as_str())
                    .font(Font::Caption)
                    .modifier(Modifier::LineLimit(1)),
                View::spacer(),
                View::text(job.status.as_str())
                    .font(Font::Caption2)
                    .foreground_color(Color::GRAY),
            ])
            .padding(Edges::Vertical, Some(1))
            .modifier(Modifier::Id(job.row_id()))
        }));
    }

    let body = View::vstack(Alignment::Leading, rows).padding(Edges::All, None);
    EntryView::new(body, tile.link)
}

/// Map widget body for a rendered tile.
#[must_use]
pub fn map_view(tile: &MapTile) -> EntryView {
    let mut layers = match &tile.background {
        MapBackground::Image(image) => vec![View::image(ImageSource::from(image))
            .modifier(Modifier::Resizable)
            .modifier(Modifier::AspectRatio(ContentMode::Fill))],
        MapBackground::Placeholder => vec![
            View::color(PLACEHOLDER_FILL),
            View::image(ImageSource::System {
                name: PLACEHOLDER_SYMBOL,
            })
            .modifier(Modifier::Resizable)
            .modifier(Modifier::Frame {
                width: PLACEHOLDER_SYMBOL_SIZE,
                height: PLACEHOLDER_SYMBOL_SIZE,
            })
            .foreground_color(Color::GRAY)
            .modifier(Modifier::MaxSize),
        ],
    };

    let badge = View::text(tile.badge.as_str())
        .font(Font::Caption)
        .font_weight(Weight::Bold)
        .padding(Edges::All, Some(4))
        .modifier(Modifier::Background(BADGE_BACKGROUND))
        .modifier(Modifier::CornerRadius(4));
    layers.push(View::vstack(Alignment::Leading, vec![badge]).padding(Edges::All, Some(8)));

    let body = View::zstack(Alignment::BottomLeading, layers);
    EntryView::new(body, tile.link)
}

/// Body for `kind` from a timeline entry.
#[must_use]
pub fn entry_view(kind: WidgetKind, entry: &WidgetEntry) -> EntryView {
    match kind {
        WidgetKind::Job => job_view(&entry.job),
        WidgetKind::Map => map_view(&entry.map),
    }
}
