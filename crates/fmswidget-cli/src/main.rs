//! `fmswidget` - CLI for the FMS home-screen widgets
//!
//! Publishes job and fleet data into the shared widget store and renders the
//! job and map widgets from it as Android `RemoteViews` or iOS view trees.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

mod cli;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};

use fmswidget::logging::init_logging;
use fmswidget::{
    decode_recent_jobs, Config, JobCounts, JobSummary, MapBackground, Platform, RefreshHost,
    SnapshotPublisher, SqliteStore, WidgetKind, WidgetSnapshot,
};
use fmswidget_android::{RemoteViews, ViewOp};
use fmswidget_ios::TimelineProvider;

use crate::cli::{Cli, Command, ConfigCommand, PublishCommand, RenderCommand, WatchCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Publish(cmd) => handle_publish(&config, &cmd),
        Command::Snapshot(cmd) => handle_snapshot(&config, cmd.json),
        Command::Render(cmd) => handle_render(&config, &cmd),
        Command::Watch(cmd) => handle_watch(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cli.config.as_deref(), cmd),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.store_path();
    debug!(path = %path.display(), "Opening widget store");
    SqliteStore::open(&path).with_context(|| format!("failed to open store {}", path.display()))
}

/// Open the store the way a widget does: never written, never an error.
fn open_store_for_reading(config: &Config) -> SqliteStore {
    SqliteStore::open_read_only(config.store_path())
}

/// Read a recent-jobs payload from a file, or stdin for `-`.
fn read_payload(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("failed to read recent jobs from stdin")?;
        return Ok(payload);
    }
    std::fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))
}

/// Strictly decode a recent-jobs payload. The publisher never writes a list
/// the widgets would reject.
fn parse_recent_jobs(payload: &str) -> fmswidget::Result<Vec<JobSummary>> {
    Ok(decode_recent_jobs(payload)?)
}

/// Overlay the given counters on the stored ones.
fn merge_counts(stored: JobCounts, cmd: &PublishCommand) -> JobCounts {
    JobCounts::new(
        cmd.open.unwrap_or(stored.open),
        cmd.ongoing.unwrap_or(stored.ongoing),
        cmd.complete.unwrap_or(stored.complete),
    )
}

fn handle_publish(config: &Config, cmd: &PublishCommand) -> Result<()> {
    let store = open_store(config)?;
    let publisher = SnapshotPublisher::new(&store);

    // Validate inputs before writing anything
    let recent = cmd
        .recent_jobs
        .as_deref()
        .map(|source| {
            let payload = read_payload(source)?;
            parse_recent_jobs(&payload)
                .with_context(|| format!("invalid recent jobs in {}", source.display()))
        })
        .transpose()?;
    let image = cmd
        .map_image
        .as_deref()
        .map(|path| {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .transpose()?;

    if cmd.has_counts() {
        let counts = merge_counts(WidgetSnapshot::read_job_counts(&store), cmd);
        publisher.set_job_counts(counts)?;
        println!("Job counts:     {counts}");
    }

    if let Some(jobs) = recent {
        publisher.set_recent_jobs(&jobs)?;
        println!("Recent jobs:    {}", jobs.len());
    }

    if let Some(active) = cmd.active {
        publisher.set_map_active_count(active)?;
        println!("Active:         {active}");
    }

    if let Some(bytes) = image {
        let path = publisher.store_map_image(&config.image_dir(), &bytes)?;
        println!("Map image:      {}", path.display());
    } else if cmd.clear_map_image {
        publisher.set_map_image_path(None)?;
        println!("Map image:      (cleared)");
    }

    info!(store = %store.path().display(), "Published widget data");
    Ok(())
}

fn handle_snapshot(config: &Config, json: bool) -> Result<()> {
    let store = open_store_for_reading(config);
    let snapshot = WidgetSnapshot::read(&store);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Widget Snapshot");
    println!("===============");
    println!();
    println!("[Jobs]");
    println!("  Open:           {}", snapshot.jobs.open);
    println!("  Ongoing:        {}", snapshot.jobs.ongoing);
    println!("  Complete:       {}", snapshot.jobs.complete);
    println!("  Recent:         {}", snapshot.recent_jobs.len());
    for job in &snapshot.recent_jobs {
        println!("    {} - {} ({})", job.title, job.status, job.time);
    }
    println!();
    println!("[Map]");
    println!("  Active:         {}", snapshot.map_active_vehicle_count);
    match &snapshot.map_image_path {
        Some(path) => println!("  Image:          {}", path.display()),
        None => println!("  Image:          (none)"),
    }
    println!();
    println!("Fingerprint: {}", snapshot.fingerprint());
    Ok(())
}

fn handle_render(config: &Config, cmd: &RenderCommand) -> Result<()> {
    let store = open_store_for_reading(config);
    let loader = config.image_loader();
    let kind = WidgetKind::from(cmd.widget);
    let platform = cmd.platform.map_or(config.render.platform, Platform::from);

    match platform {
        Platform::Android => {
            let views = fmswidget_android::build_views(kind, &store, &loader);
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                print_remote_views(&views);
            }
        }
        Platform::Ios => {
            let timeline = TimelineProvider::new(&store, &loader).timeline(Utc::now());
            for entry in &timeline.entries {
                let view = fmswidget_ios::entry_view(kind, entry);
                if cmd.json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                } else {
                    println!("{} @ {}", kind, entry.date.to_rfc3339());
                    for text in view.body.texts() {
                        println!("  {text}");
                    }
                    println!("  -> {}", view.widget_url);
                }
            }
        }
    }
    Ok(())
}

fn print_remote_views(views: &RemoteViews) {
    println!("layout {}", views.layout);
    for op in &views.ops {
        match op {
            ViewOp::SetOnClickDeepLink { view_id, uri } => println!("  {view_id}: click -> {uri}"),
            ViewOp::SetText { view_id, text } => println!("  {view_id}: text {text:?}"),
            ViewOp::SetVisibility {
                view_id,
                visibility,
            } => println!("  {view_id}: {visibility:?}"),
            ViewOp::SetImageBitmap {
                view_id,
                source,
                format,
                bytes,
                ..
            } => println!(
                "  {view_id}: bitmap {} ({format}, {} bytes)",
                source.display(),
                bytes.len()
            ),
            ViewOp::SetImageResource {
                view_id, resource, ..
            } => println!("  {view_id}: resource @drawable/{resource}"),
        }
    }
}

async fn handle_watch(config: &Config, cmd: &WatchCommand) -> Result<()> {
    let store = open_store_for_reading(config);
    let interval = cmd
        .interval
        .map_or_else(|| config.refresh_interval(), std::time::Duration::from_secs);

    let mut host = RefreshHost::new(store, config.image_loader(), interval);
    let handle = host.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        host.store().path().display(),
        interval.as_secs()
    );

    let ticks = host
        .run(|tick| {
            let marker = if tick.changed { "*" } else { " " };
            let background = match tick.map.background {
                MapBackground::Image(_) => "image",
                MapBackground::Placeholder => "placeholder",
            };
            println!(
                "{marker} #{:<4} jobs {}  recent {}  {}  map {}",
                tick.sequence,
                tick.job.counts,
                tick.job.visible_count(),
                tick.map.badge,
                background
            );
        })
        .await;

    println!("Stopped after {ticks} refreshes.");
    Ok(())
}

fn handle_config(config: &Config, config_path: Option<&Path>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Path:               {}", config.store_path().display());
                println!();
                println!("[Image]");
                println!("  Directory:          {}", config.image_dir().display());
                println!("  Max bytes:          {}", config.image.max_bytes);
                println!();
                println!("[Refresh]");
                println!("  Interval (secs):    {}", config.refresh.interval_secs);
                println!();
                println!("[Render]");
                println!("  Platform:           {}", config.render.platform);
                println!(
                    "  Android:            {}",
                    fmswidget_android::platform_name()
                );
                println!(
                    "  iOS app group:      {}",
                    fmswidget_ios::APP_GROUP
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.map_or_else(Config::default_config_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or_else(|| config_path.map(Path::to_path_buf))
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => anyhow::bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
