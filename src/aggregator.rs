// ABOUTME: Accepted fix history and the speed, distance and pace metadata derived from it
// ABOUTME: Metadata is recomputed from the history on every call, whole session and trailing window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Session Aggregator
//!
//! [`SessionHistory`] is the append-only list of fixes the session accepted, in
//! acceptance order. [`WindowMetadata::compute`] sorts a snapshot by timestamp
//! and derives the session statistics. Every figure is optional: it is absent
//! whenever there is not enough data, or when a distance or duration comes out
//! zero or non-finite.
//!
//! Speeds are reported two ways: from location updates (distance over elapsed
//! time between fixes) and from the speed field the device attaches to each fix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pacetrack_core::formatters::to_pace;
use pacetrack_core::models::{seconds_between, Fix};

/// Ordered list of accepted fixes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    fixes: Vec<Fix>,
}

impl SessionHistory {
    /// Empty history
    #[must_use]
    pub const fn new() -> Self {
        Self { fixes: Vec::new() }
    }

    /// Append an accepted fix
    pub fn push(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.fixes.clear();
    }

    /// Entries in acceptance order
    #[must_use]
    pub fn as_slice(&self) -> &[Fix] {
        &self.fixes
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Most recently accepted fix
    #[must_use]
    pub fn last(&self) -> Option<&Fix> {
        self.fixes.last()
    }

    /// Metadata over the whole history
    #[must_use]
    pub fn metadata(&self, window: MetadataWindow, now: DateTime<Utc>) -> WindowMetadata {
        WindowMetadata::compute(&self.fixes, window, now)
    }
}

impl From<Vec<Fix>> for SessionHistory {
    fn from(fixes: Vec<Fix>) -> Self {
        Self { fixes }
    }
}

/// Trailing window over which the windowed figures are computed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataWindow {
    /// Only fixes younger than this many seconds are windowed
    pub time_window_secs: Option<f64>,
    /// Accepted for API compatibility; does not limit the windowed distance
    pub distance_window_m: Option<f64>,
}

impl MetadataWindow {
    /// Window limited by time only
    #[must_use]
    pub const fn seconds(time_window_secs: f64) -> Self {
        Self {
            time_window_secs: Some(time_window_secs),
            distance_window_m: None,
        }
    }

    /// Add a distance window
    #[must_use]
    pub const fn with_distance(mut self, distance_window_m: f64) -> Self {
        self.distance_window_m = Some(distance_window_m);
        self
    }
}

/// Snapshot of distance, duration, speed and pace statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowMetadata {
    /// Sum of distances between chronologically adjacent fixes (m)
    pub distance_covered_m: Option<f64>,
    /// Newest minus oldest timestamp (s)
    pub total_duration_secs: Option<f64>,
    /// Distance covered over total duration (m/s)
    pub avg_speed_from_location_updates: Option<f64>,
    /// Mean of the valid device speeds (m/s)
    pub avg_speed_from_device: Option<f64>,
    /// Distance covered inside the window (m)
    pub window_distance_covered_m: Option<f64>,
    /// Newest minus oldest timestamp inside the window (s)
    pub window_duration_secs: Option<f64>,
    /// Windowed distance over windowed duration (m/s)
    pub avg_window_speed_from_location_updates: Option<f64>,
    /// Mean of the valid device speeds inside the window (m/s)
    pub avg_window_speed_from_device: Option<f64>,
    /// Speed between the two newest fixes (m/s)
    pub current_speed_from_location_updates: Option<f64>,
    /// Device speed of the newest fix (m/s)
    pub current_speed_from_device: Option<f64>,
}

impl WindowMetadata {
    /// Compute the metadata for `fixes` as seen at `now`
    #[must_use]
    pub fn compute(fixes: &[Fix], window: MetadataWindow, now: DateTime<Utc>) -> Self {
        let mut sorted = fixes.to_vec();
        sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        let Some(newest) = sorted.first() else {
            return Self::default();
        };

        let windowed: Vec<Fix> = window.time_window_secs.map_or_else(Vec::new, |limit| {
            sorted
                .iter()
                .filter(|fix| fix.age_at(now) < limit)
                .copied()
                .collect()
        });

        let mut metadata = Self {
            avg_speed_from_device: mean_device_speed(&sorted),
            avg_window_speed_from_device: mean_device_speed(&windowed),
            current_speed_from_device: newest.valid_speed(),
            ..Self::default()
        };

        if sorted.len() < 2 {
            return metadata;
        }

        metadata.distance_covered_m = path_distance(&sorted);
        metadata.total_duration_secs = span_duration(&sorted);
        metadata.avg_speed_from_location_updates =
            speed(metadata.distance_covered_m, metadata.total_duration_secs);

        if windowed.len() >= 2 {
            metadata.window_distance_covered_m = path_distance(&windowed);
            metadata.window_duration_secs = span_duration(&windowed);
            metadata.avg_window_speed_from_location_updates = speed(
                metadata.window_distance_covered_m,
                metadata.window_duration_secs,
            );
        }

        metadata.current_speed_from_location_updates = speed(
            path_distance(&sorted[..2]),
            span_duration(&sorted[..2]),
        );

        metadata
    }

    /// Reciprocal of [`Self::avg_speed_from_location_updates`] (s/m)
    #[must_use]
    pub fn avg_pace_from_location_updates(&self) -> Option<f64> {
        self.avg_speed_from_location_updates.map(to_pace)
    }

    /// Reciprocal of [`Self::avg_speed_from_device`] (s/m)
    #[must_use]
    pub fn avg_pace_from_device(&self) -> Option<f64> {
        self.avg_speed_from_device.map(to_pace)
    }

    /// Reciprocal of [`Self::avg_window_speed_from_location_updates`] (s/m)
    #[must_use]
    pub fn avg_window_pace_from_location_updates(&self) -> Option<f64> {
        self.avg_window_speed_from_location_updates.map(to_pace)
    }

    /// Reciprocal of [`Self::avg_window_speed_from_device`] (s/m)
    #[must_use]
    pub fn avg_window_pace_from_device(&self) -> Option<f64> {
        self.avg_window_speed_from_device.map(to_pace)
    }

    /// Reciprocal of [`Self::current_speed_from_location_updates`] (s/m)
    #[must_use]
    pub fn current_pace_from_location_updates(&self) -> Option<f64> {
        self.current_speed_from_location_updates.map(to_pace)
    }

    /// Reciprocal of [`Self::current_speed_from_device`] (s/m)
    #[must_use]
    pub fn current_pace_from_device(&self) -> Option<f64> {
        self.current_speed_from_device.map(to_pace)
    }
}

fn mean_device_speed(fixes: &[Fix]) -> Option<f64> {
    let speeds: Vec<f64> = fixes.iter().filter_map(Fix::valid_speed).collect();
    if speeds.is_empty() {
        return None;
    }
    Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
}

// Expects newest-first ordering.
fn path_distance(sorted: &[Fix]) -> Option<f64> {
    let total: f64 = sorted
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();
    total.is_finite().then_some(total)
}

// Expects newest-first ordering.
fn span_duration(sorted: &[Fix]) -> Option<f64> {
    let (newest, oldest) = (sorted.first()?, sorted.last()?);
    let duration = seconds_between(newest.timestamp(), oldest.timestamp());
    (duration != 0.0 && duration.is_finite()).then_some(duration)
}

fn speed(distance: Option<f64>, duration: Option<f64>) -> Option<f64> {
    Some(distance? / duration?)
}
