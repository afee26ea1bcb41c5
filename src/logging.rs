// ABOUTME: Logging configuration and structured logging setup for tracking sessions
// ABOUTME: Configures log levels and output format, plus helpers for recurring tracker events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Structured logging setup
//!
//! Hosts that already own a tracing subscriber can skip this module entirely;
//! the library only emits `tracing` events.

use anyhow::Result;
use serde_json::json;
use std::env;
use std::io;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

use pacetrack_core::errors::TrackerError;
use pacetrack_core::models::Fix;

use crate::filter::Verdict;
use crate::profile::TrackingProfile;

const DEFAULT_SERVICE_NAME: &str = "pacetrack";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for replay output
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: DEFAULT_SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Override the output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the filter: `RUST_LOG` when set, otherwise the configured level
    fn env_filter(&self) -> EnvFilter {
        env::var("RUST_LOG")
            .map_or_else(|_| EnvFilter::new(&self.level), EnvFilter::new)
            .add_directive(
                format!("pacetrack={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(self.span_events())
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(self.span_events());

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();

        Ok(())
    }

    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            config = %config_summary,
            "Logging initialized"
        );
    }
}

/// Initialize logging with default configuration
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_default() -> Result<()> {
    LoggingConfig::default().init()
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured log helpers for recurring tracker events
pub struct TrackerLogger;

impl TrackerLogger {
    /// Log the outcome of running a batch through the quality filter
    pub fn log_fix_selected(session_id: Uuid, fix: &Fix, batch_len: usize, is_best: bool) {
        debug!(
            session.id = %session_id,
            fix.latitude = fix.latitude(),
            fix.longitude = fix.longitude(),
            fix.accuracy = fix.horizontal_accuracy(),
            fix.speed = fix.speed(),
            batch.len = batch_len,
            fix.is_best = is_best,
            "Fix accepted into session history"
        );
    }

    /// Log a filter decision against the best fix
    pub fn log_filter_verdict(session_id: Uuid, verdict: Verdict) {
        debug!(
            session.id = %session_id,
            filter.verdict = %verdict,
            filter.accepted = verdict.is_accepted(),
            "Quality filter verdict"
        );
    }

    /// Log an active profile switch
    pub fn log_profile_change(
        session_id: Uuid,
        previous: &TrackingProfile,
        next: &TrackingProfile,
        window_speed: Option<f64>,
    ) {
        info!(
            session.id = %session_id,
            profile.previous = %previous,
            profile.next = %next,
            profile.window_speed = ?window_speed,
            "Tracking profile changed"
        );
    }

    /// Log a failure reported by the location source
    pub fn log_source_failure(session_id: Uuid, error: &TrackerError, pending_request: bool) {
        warn!(
            session.id = %session_id,
            error.code = %error.code().as_u16(),
            error.message = %error,
            request.pending = pending_request,
            "Location source failure"
        );
    }
}
