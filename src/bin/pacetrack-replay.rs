// ABOUTME: Replays a recorded fix records file through a tracking session
// ABOUTME: Prints the profile chosen per batch and the final session statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Usage:
//! ```bash
//! # Replay a debug capture with default settings
//! cargo run --bin pacetrack-replay -- locations.json
//!
//! # Force battery saving and export the accepted route
//! cargo run --bin pacetrack-replay -- locations.json --power-save on --gpx
//!
//! # Keep the initial profile fixed
//! cargo run --bin pacetrack-replay -- locations.json --initial-profile run --no-auto-profile
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use pacetrack::aggregator::{MetadataWindow, WindowMetadata};
use pacetrack::clock::ManualClock;
use pacetrack::config::TrackerConfig;
use pacetrack::constants::export::{GPX_FILE_NAME, RECORDS_FILE_NAME};
use pacetrack::errors::TrackerResult;
use pacetrack::export::{read_records_file, write_gpx_file, write_records_file};
use pacetrack::formatters::{
    format_distance, format_duration_clock, format_running_pace, format_speed, DistanceUnit,
    TimeUnit,
};
use pacetrack::logging::{LogFormat, LoggingConfig};
use pacetrack::profile::{PowerSaveOption, ProfilePreset};
use pacetrack::session::TrackingSession;
use pacetrack::source::{
    AuthorizationLevel, AuthorizationStatus, LocationSource, SourceConfiguration,
};

#[derive(Parser)]
#[command(
    name = "pacetrack-replay",
    about = "Replay recorded location fixes through a tracking session",
    long_about = "Feeds every batch of a structured fix records file into a tracking session, \
                  with the session clock positioned at each batch's newest fix."
)]
struct ReplayArgs {
    /// Structured fix records file (array of batches)
    input: PathBuf,

    /// Power save option: auto, on or off
    #[arg(long)]
    power_save: Option<PowerSaveOption>,

    /// Profile active before the first batch
    #[arg(long)]
    initial_profile: Option<ProfilePreset>,

    /// Keep the initial profile for the whole replay
    #[arg(long)]
    no_auto_profile: bool,

    /// Trailing window in seconds for the windowed statistics
    #[arg(long, default_value = "10")]
    window: f64,

    /// Write the accepted fixes as a GPX route track (defaults to `route.gpx` when no path is given)
    #[arg(long, num_args = 0..=1, default_missing_value = GPX_FILE_NAME)]
    gpx: Option<PathBuf>,

    /// Re-write the replayed batches as a records file (defaults to `locations.json` when no path is given)
    #[arg(long, num_args = 0..=1, default_missing_value = RECORDS_FILE_NAME)]
    records: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Source that accepts every command; fixes are fed in by the replay loop
#[derive(Debug, Default)]
struct ReplaySource;

#[async_trait]
impl LocationSource for ReplaySource {
    fn services_enabled(&self) -> bool {
        true
    }

    fn authorization(&self) -> AuthorizationStatus {
        AuthorizationStatus::AuthorizedAlways
    }

    async fn configure(&self, configuration: SourceConfiguration) -> TrackerResult<()> {
        debug!(?configuration, "Replay source configured");
        Ok(())
    }

    async fn start(&self) -> TrackerResult<()> {
        Ok(())
    }

    async fn stop(&self) -> TrackerResult<()> {
        Ok(())
    }

    async fn request_one(&self) -> TrackerResult<()> {
        Ok(())
    }

    async fn request_authorization(&self, _level: AuthorizationLevel) -> TrackerResult<()> {
        Ok(())
    }
}

fn print_summary(metadata: &WindowMetadata, accepted: usize) {
    let distance = |value: Option<f64>| {
        value.map_or_else(
            || "-".to_owned(),
            |m| format_distance(m, DistanceUnit::Kilometer, DistanceUnit::Meter, 3, true),
        )
    };
    let speed = |value: Option<f64>| {
        value.map_or_else(
            || "-".to_owned(),
            |mps| format_speed(mps, DistanceUnit::Kilometer, TimeUnit::Hour, 2, true),
        )
    };
    let pace = |value: Option<f64>| value.map_or_else(|| "-".to_owned(), format_running_pace);

    println!("accepted fixes:        {accepted}");
    println!("distance:              {}", distance(metadata.distance_covered_m));
    println!(
        "duration:              {}",
        metadata
            .total_duration_secs
            .map_or_else(|| "-".to_owned(), format_duration_clock)
    );
    println!(
        "avg speed (updates):   {}",
        speed(metadata.avg_speed_from_location_updates)
    );
    println!("avg speed (device):    {}", speed(metadata.avg_speed_from_device));
    println!(
        "window speed:          {}",
        speed(metadata.avg_window_speed_from_location_updates)
    );
    println!(
        "current speed:         {}",
        speed(metadata.current_speed_from_location_updates)
    );
    println!(
        "avg pace (updates):    {}",
        pace(metadata.avg_pace_from_location_updates())
    );
    println!(
        "avg pace (device):     {}",
        pace(metadata.avg_pace_from_device())
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    let mut logging = LoggingConfig::from_env().with_format(LogFormat::Compact);
    if args.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = TrackerConfig::from_env()?;
    if let Some(power_save) = args.power_save {
        config.power_save = power_save;
    }
    if let Some(initial_profile) = args.initial_profile {
        config.initial_profile = initial_profile;
    }
    if args.no_auto_profile {
        config.automatic_profile_change = false;
    }

    let batches = read_records_file(&args.input, Utc::now())
        .with_context(|| format!("Failed to read records from {}", args.input.display()))?;
    let start = batches
        .iter()
        .flatten()
        .map(pacetrack::models::Fix::timestamp)
        .min()
        .unwrap_or_else(Utc::now);

    let clock = Arc::new(ManualClock::new(start));
    let session = TrackingSession::builder(Arc::new(ReplaySource))
        .clock(clock.clone())
        .config(config)
        .build();

    session.set_route_recording(true).await;
    session.set_debug_recording(args.records.is_some()).await;
    session.set_enabled(true).await?;

    info!(
        session.id = %session.id(),
        batches = batches.len(),
        input = %args.input.display(),
        "Replaying fix records"
    );

    for (index, batch) in batches.into_iter().enumerate() {
        if let Some(newest) = batch.iter().map(pacetrack::models::Fix::timestamp).max() {
            clock.set(newest);
        }
        let batch_len = batch.len();
        session.handle_fix_batch(batch).await;

        let profile = session.active_profile().await.to_string();
        let window_speed = session
            .metadata(MetadataWindow::seconds(args.window))
            .await
            .avg_window_speed_from_location_updates;
        println!(
            "batch {index:04}  fixes {batch_len:3}  profile {profile:<28}  window speed {}",
            window_speed.map_or_else(|| "-".to_owned(), |s| format!("{s:.2} m/s"))
        );
    }

    let history = session.history().await;
    let metadata = session.metadata(MetadataWindow::seconds(args.window)).await;
    print_summary(&metadata, history.len());

    if let Some(path) = &args.gpx {
        write_gpx_file(path, &session.recorded_route().await)
            .with_context(|| format!("Failed to write GPX to {}", path.display()))?;
    }
    if let Some(path) = &args.records {
        write_records_file(path, &session.recorded_batches().await)
            .with_context(|| format!("Failed to write records to {}", path.display()))?;
    }

    session.set_enabled(false).await?;
    Ok(())
}
