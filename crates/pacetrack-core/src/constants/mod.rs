// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for speed bands, session timing, units, and export formats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Unit conversion and measurement constants
pub mod units;

/// Speed band boundaries in meters per second
pub mod speed_bands;

/// Session timing defaults
pub mod session {
    /// Seconds of silence after a successful batch before a single fix is re-requested
    pub const FAILSAFE_INTERVAL_SECS: u64 = 10;
    /// Trailing window used by automatic profile classification
    pub const CLASSIFICATION_WINDOW_SECS: f64 = 10.0;
    /// Broadcast buffer for session events
    pub const EVENT_BUFFER_SIZE: usize = 64;
}

/// Battery thresholds for automatic power saving
pub mod power {
    /// Lowest battery level (inclusive) at which automatic power saving engages
    pub const AUTO_SAVING_MIN_LEVEL: f32 = 0.0;
    /// Highest battery level (inclusive) at which automatic power saving engages
    pub const AUTO_SAVING_MAX_LEVEL: f32 = 0.3;
}

/// Export format constants
pub mod export {
    /// chrono format for export timestamps, `yyyy-MM-dd'T'HH:mm:ss.SSS±hhmm`
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
    /// Creator attribute written into route tracks
    pub const GPX_CREATOR: &str = "pacetrack";
    /// Default file name for structured debug records
    pub const RECORDS_FILE_NAME: &str = "locations.json";
    /// Default file name for route tracks
    pub const GPX_FILE_NAME: &str = "route.gpx";
}
