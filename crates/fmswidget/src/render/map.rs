//! Map widget: snapshot image or placeholder, with an active vehicle badge.

use tracing::debug;

use crate::deeplink::DeepLink;
use crate::image::{ImageLoader, MapImage};
use crate::snapshot::WidgetSnapshot;
use crate::store::SnapshotStore;

/// Background of the map tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapBackground {
    /// The last map snapshot, scaled to fill and cropped to the tile.
    Image(MapImage),
    /// Neutral fill with a centered map glyph.
    Placeholder,
}

impl MapBackground {
    /// Whether this is the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// What the map widget displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTile {
    /// Active vehicle count, 0 when absent.
    pub active_vehicles: u64,
    /// Badge text, always present: `Active: <count>`.
    pub badge: String,
    /// Image or placeholder.
    pub background: MapBackground,
    /// Tile-wide tap target.
    pub link: DeepLink,
}

impl MapTile {
    /// Build a tile from the counter and a resolved background.
    #[must_use]
    pub fn new(active_vehicles: u64, background: MapBackground) -> Self {
        Self {
            active_vehicles,
            badge: badge_text(active_vehicles),
            background,
            link: DeepLink::Map,
        }
    }
}

/// Badge text for an active vehicle count.
#[must_use]
pub fn badge_text(active_vehicles: u64) -> String {
    format!("Active: {active_vehicles}")
}

/// Renders the map widget from an injected store and image loader.
pub struct MapWidgetRenderer<'a> {
    store: &'a dyn SnapshotStore,
    loader: &'a dyn ImageLoader,
}

impl std::fmt::Debug for MapWidgetRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWidgetRenderer").finish_non_exhaustive()
    }
}

impl<'a> MapWidgetRenderer<'a> {
    /// Create a renderer reading from `store` and loading images with `loader`.
    #[must_use]
    pub fn new(store: &'a dyn SnapshotStore, loader: &'a dyn ImageLoader) -> Self {
        Self { store, loader }
    }

    /// Read the store, try the image, and build the tile.
    #[must_use]
    pub fn render(&self) -> MapTile {
        let active = WidgetSnapshot::read_map_active_count(self.store);
        let background = self.resolve_background();
        debug!(
            active,
            placeholder = background.is_placeholder(),
            "Rendered map tile"
        );
        MapTile::new(active, background)
    }

    fn resolve_background(&self) -> MapBackground {
        let Some(path) = WidgetSnapshot::read_map_image_path(self.store) else {
            return MapBackground::Placeholder;
        };

        match self.loader.load(&path) {
            Ok(image) => MapBackground::Image(image),
            Err(e) => {
                debug!(error = %e, "Map image unavailable, using placeholder");
                MapBackground::Placeholder
            }
        }
    }
}
