//! Command-line interface for fmswidget.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fmswidget::logging::Verbosity;

pub use commands::{
    ConfigCommand, PlatformArg, PublishCommand, RenderCommand, SnapshotCommand, WatchCommand,
    WidgetArg,
};

/// fmswidget - Publish and preview the FMS home-screen widgets
///
/// Writes job and fleet data into the shared widget store the way the app
/// does, and renders the job and map widgets from it for either platform.
#[derive(Debug, Parser)]
#[command(name = "fmswidget")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write widget data into the store
    Publish(PublishCommand),

    /// Show the snapshot as the widgets read it
    Snapshot(SnapshotCommand),

    /// Render one widget
    Render(RenderCommand),

    /// Re-render both widgets periodically until interrupted
    Watch(WatchCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "fmswidget");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["fmswidget", "snapshot"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["fmswidget", "-v", "snapshot"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["fmswidget", "snapshot", "-vv"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["fmswidget", "-q", "-v", "snapshot"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_publish_fields() {
        let cli = parse(&[
            "fmswidget",
            "publish",
            "--open",
            "2",
            "--complete",
            "5",
            "--recent-jobs",
            "-",
        ]);
        let Command::Publish(cmd) = cli.command else {
            panic!("expected publish");
        };
        assert_eq!(cmd.open, Some(2));
        assert_eq!(cmd.ongoing, None);
        assert_eq!(cmd.complete, Some(5));
        assert_eq!(cmd.recent_jobs, Some(PathBuf::from("-")));
        assert!(!cmd.clear_map_image);
    }

    #[test]
    fn test_publish_requires_a_field() {
        assert!(Cli::try_parse_from(["fmswidget", "publish"]).is_err());
    }

    #[test]
    fn test_publish_rejects_negative_count() {
        assert!(Cli::try_parse_from(["fmswidget", "publish", "--open", "-1"]).is_err());
    }

    #[test]
    fn test_publish_map_image_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "fmswidget",
            "publish",
            "--map-image",
            "map.png",
            "--clear-map-image",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_render() {
        let cli = parse(&["fmswidget", "render", "map", "--platform", "ios", "--json"]);
        let Command::Render(cmd) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(cmd.widget, WidgetArg::Map);
        assert_eq!(cmd.platform, Some(PlatformArg::Ios));
        assert!(cmd.json);
    }

    #[test]
    fn test_render_rejects_unknown_widget() {
        assert!(Cli::try_parse_from(["fmswidget", "render", "clock"]).is_err());
    }

    #[test]
    fn test_parse_watch_interval() {
        let cli = parse(&["fmswidget", "watch", "--interval", "5"]);
        assert!(matches!(
            cli.command,
            Command::Watch(WatchCommand { interval: Some(5) })
        ));
        assert!(Cli::try_parse_from(["fmswidget", "watch", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_parse_config_validate_positional() {
        let cli = parse(&["fmswidget", "config", "validate", "/tmp/x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = parse(&["fmswidget", "config", "path", "-c", "/tmp/fms.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/fms.toml")));
    }
}
