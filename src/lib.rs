// ABOUTME: Main library entry point for the pacetrack location tracking engine
// ABOUTME: Quality filtering, adaptive acquisition profiles, and session speed/pace statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

#![deny(unsafe_code)]

//! # Pacetrack
//!
//! Pacetrack ingests a noisy, irregular stream of geolocation fixes and
//!
//! - decides, fix by fix, whether a new reading should replace the best known
//!   position ([`filter`]),
//! - adapts the acquisition profile (accuracy/power trade-off) to the motion
//!   speed observed over a trailing window ([`profile`]),
//! - derives trip-level and instantaneous speed and pace statistics from the
//!   accepted fix history ([`aggregator`]).
//!
//! A [`session::TrackingSession`] orchestrates the three on top of an injected
//! [`source::LocationSource`]. Rendering, permission prompts and sensor
//! acquisition belong to the host application.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pacetrack::config::TrackerConfig;
//! use pacetrack::errors::TrackerResult;
//! use pacetrack::session::TrackingSession;
//! use pacetrack::source::LocationSource;
//!
//! async fn start(source: Arc<dyn LocationSource>) -> TrackerResult<()> {
//!     let session = TrackingSession::builder(source)
//!         .config(TrackerConfig::from_env()?)
//!         .build();
//!     session.set_enabled(true).await?;
//!     Ok(())
//! }
//! ```

/// Injectable wall clock
pub mod clock;

/// Environment based tracker configuration
pub mod config;

/// Fix quality filter
pub mod filter;

/// Tracking profiles, power saving and speed classification
pub mod profile;

/// Session history and windowed speed/pace metadata
pub mod aggregator;

/// Location source and battery collaborator interfaces
pub mod source;

/// Tracking session controller
pub mod session;

/// Structured record and route track export sinks
pub mod export;

/// Structured logging setup and helpers
pub mod logging;

pub use pacetrack_core::{constants, errors, formatters, geodesy, models};
