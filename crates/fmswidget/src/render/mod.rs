//! Platform-agnostic widget rendering.
//!
//! A renderer reads the store once per invocation and produces a tile: a plain
//! value describing what the widget shows. Slot visibility, counter defaults,
//! and the image-or-placeholder decision all happen here. The platform crates
//! only translate a tile into their native view description.

pub mod job;
pub mod map;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::deeplink::DeepLink;
use crate::error::{Error, Result};
use crate::image::ImageLoader;
use crate::store::SnapshotStore;

pub use job::{JobSlot, JobTile, JobWidgetRenderer};
pub use map::{MapBackground, MapTile, MapWidgetRenderer};

/// The two home-screen widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Job counters and recent jobs.
    Job,
    /// Fleet map with active vehicle badge.
    Map,
}

impl WidgetKind {
    /// Both widgets, in bundle order.
    pub const ALL: [Self; 2] = [Self::Job, Self::Map];

    /// Deep link attached to the whole tile.
    #[must_use]
    pub fn link(self) -> DeepLink {
        match self {
            Self::Job => DeepLink::Job,
            Self::Map => DeepLink::Map,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job => write!(f, "job"),
            Self::Map => write!(f, "map"),
        }
    }
}

impl FromStr for WidgetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "job" => Ok(Self::Job),
            "map" => Ok(Self::Map),
            _ => Err(Error::UnknownWidget {
                name: s.to_string(),
            }),
        }
    }
}

/// A rendered tile of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    /// Job widget tile.
    Job(JobTile),
    /// Map widget tile.
    Map(MapTile),
}

impl Tile {
    /// Which widget produced this tile.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Job(_) => WidgetKind::Job,
            Self::Map(_) => WidgetKind::Map,
        }
    }

    /// Deep link attached to the tile.
    #[must_use]
    pub fn link(&self) -> DeepLink {
        match self {
            Self::Job(tile) => tile.link,
            Self::Map(tile) => tile.link,
        }
    }
}

/// Render one widget from the store.
#[must_use]
pub fn render(kind: WidgetKind, store: &dyn SnapshotStore, loader: &dyn ImageLoader) -> Tile {
    match kind {
        WidgetKind::Job => Tile::Job(JobWidgetRenderer::new(store).render()),
        WidgetKind::Map => Tile::Map(MapWidgetRenderer::new(store, loader).render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::FsImageLoader;
    use crate::store::{keys, MemoryStore};

    #[test]
    fn test_widget_kind_links() {
        assert_eq!(WidgetKind::Job.link().uri(), "fms://job");
        assert_eq!(WidgetKind::Map.link().uri(), "fms://map");
    }

    #[test]
    fn test_widget_kind_parse_display() {
        for kind in WidgetKind::ALL {
            assert_eq!(kind.to_string().parse::<WidgetKind>().unwrap(), kind);
        }
        assert_eq!("MAP".parse::<WidgetKind>().unwrap(), WidgetKind::Map);
        assert!(matches!(
            "clock".parse::<WidgetKind>(),
            Err(Error::UnknownWidget { name }) if name == "clock"
        ));
    }

    #[test]
    fn test_render_dispatch() {
        let store = MemoryStore::new().with_int(keys::MAP_ACTIVE_COUNT, 2);
        let loader = FsImageLoader::new();

        for kind in WidgetKind::ALL {
            let tile = render(kind, &store, &loader);
            assert_eq!(tile.kind(), kind);
            assert_eq!(tile.link(), kind.link());
        }
    }
}
