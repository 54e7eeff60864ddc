//! `fmswidget` - Home-screen widget snapshot contract and renderers
//!
//! The application publishes a small snapshot of job and fleet state into a
//! shared key-value store. Widget renderers read it back on an OS-driven
//! schedule and turn it into a tile. This crate holds everything both
//! platforms share: the key table, the recent-jobs codec, store access, image
//! loading, deep links, and the tile renderers.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod deeplink;
pub mod error;
pub mod image;
pub mod logging;
pub mod publish;
pub mod refresh;
pub mod render;
pub mod snapshot;
pub mod store;

pub use codec::{decode_recent_jobs, recent_jobs_or_empty, CodecError, MAX_RECENT_SLOTS};
pub use config::{Config, Platform};
pub use deeplink::DeepLink;
pub use error::{Error, Result};
pub use self::image::{FsImageLoader, ImageError, ImageFormat, ImageLoader, MapImage};
pub use logging::init_logging;
pub use publish::SnapshotPublisher;
pub use refresh::{RefreshHandle, RefreshHost, RefreshTick};
pub use render::{
    JobSlot, JobTile, JobWidgetRenderer, MapBackground, MapTile, MapWidgetRenderer, Tile,
    WidgetKind,
};
pub use snapshot::{JobCounts, JobSummary, WidgetSnapshot};
pub use store::{MemoryStore, SnapshotStore, SnapshotWriter, SqliteStore};
