//! CLI command definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use fmswidget::{Platform, WidgetKind};

/// Publish command arguments.
///
/// Only the given fields are written; everything else in the store is left
/// as it is.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("fields").required(true).multiple(true)))]
pub struct PublishCommand {
    /// Open job count
    #[arg(long, group = "fields", value_name = "N")]
    pub open: Option<u64>,

    /// Ongoing job count
    #[arg(long, group = "fields", value_name = "N")]
    pub ongoing: Option<u64>,

    /// Completed job count
    #[arg(long, group = "fields", value_name = "N")]
    pub complete: Option<u64>,

    /// Active vehicle count
    #[arg(long, group = "fields", value_name = "N")]
    pub active: Option<u64>,

    /// JSON array of {title, status, time} objects; `-` reads stdin
    #[arg(long, group = "fields", value_name = "FILE")]
    pub recent_jobs: Option<PathBuf>,

    /// Image file to publish as the map snapshot
    #[arg(long, group = "fields", value_name = "FILE")]
    pub map_image: Option<PathBuf>,

    /// Remove the map snapshot path
    #[arg(long, group = "fields", conflicts_with = "map_image")]
    pub clear_map_image: bool,
}

impl PublishCommand {
    /// Whether any of the three job counters was given.
    #[must_use]
    pub fn has_counts(&self) -> bool {
        self.open.is_some() || self.ongoing.is_some() || self.complete.is_some()
    }
}

/// Snapshot command arguments.
#[derive(Debug, Args)]
pub struct SnapshotCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Widget to render
    #[arg(value_enum)]
    pub widget: WidgetArg,

    /// Platform view description to produce (defaults to `render.platform`)
    #[arg(short, long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Watch command arguments.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Seconds between refreshes (defaults to `refresh.interval_secs`)
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Configuration file to validate (defaults to the active one)
        file: Option<PathBuf>,
    },
}

/// Widget argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WidgetArg {
    /// Job overview widget
    Job,
    /// Fleet map widget
    Map,
}

impl From<WidgetArg> for WidgetKind {
    fn from(arg: WidgetArg) -> Self {
        match arg {
            WidgetArg::Job => Self::Job,
            WidgetArg::Map => Self::Map,
        }
    }
}

/// Platform argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    /// Android `RemoteViews`
    Android,
    /// iOS `WidgetKit` view tree
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Android => Self::Android,
            PlatformArg::Ios => Self::Ios,
        }
    }
}
