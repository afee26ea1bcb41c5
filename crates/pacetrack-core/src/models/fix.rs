// ABOUTME: Immutable geolocation fix with position, accuracy, motion, and timestamp
// ABOUTME: Produced by an external location source, consumed by the filter and aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geodesy::haversine_distance_m;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// One geolocation reading
///
/// A fix is a plain value: it is never mutated after the source hands it over.
/// The `with_*` methods consume and return a new value and are meant for the
/// source adapter (and tests) while assembling a reading.
///
/// Negative `horizontal_accuracy` marks an invalid position, negative `speed`
/// or `course` an unknown value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    coordinate: Coordinate,
    altitude: f64,
    horizontal_accuracy: f64,
    vertical_accuracy: f64,
    speed: f64,
    course: f64,
    timestamp: DateTime<Utc>,
}

impl Fix {
    /// Coordinate-only fix: zero horizontal accuracy, unknown vertical
    /// accuracy, speed and course
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            altitude: 0.0,
            horizontal_accuracy: 0.0,
            vertical_accuracy: -1.0,
            speed: -1.0,
            course: -1.0,
            timestamp,
        }
    }

    /// Set altitude in meters
    #[must_use]
    pub const fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    /// Set horizontal accuracy radius in meters
    #[must_use]
    pub const fn with_horizontal_accuracy(mut self, accuracy: f64) -> Self {
        self.horizontal_accuracy = accuracy;
        self
    }

    /// Set vertical accuracy in meters
    #[must_use]
    pub const fn with_vertical_accuracy(mut self, accuracy: f64) -> Self {
        self.vertical_accuracy = accuracy;
        self
    }

    /// Set device-reported speed in m/s
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set course in degrees from true north
    #[must_use]
    pub const fn with_course(mut self, course: f64) -> Self {
        self.course = course;
        self
    }

    /// Position of the fix
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Latitude in degrees
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    /// Longitude in degrees
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }

    /// Altitude in meters
    #[must_use]
    pub const fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Horizontal accuracy radius in meters
    #[must_use]
    pub const fn horizontal_accuracy(&self) -> f64 {
        self.horizontal_accuracy
    }

    /// Vertical accuracy in meters
    #[must_use]
    pub const fn vertical_accuracy(&self) -> f64 {
        self.vertical_accuracy
    }

    /// Device-reported speed in m/s, negative when unknown
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Course in degrees, negative when unknown
    #[must_use]
    pub const fn course(&self) -> f64 {
        self.course
    }

    /// Time the reading was taken
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the horizontal position is usable
    #[must_use]
    pub fn has_valid_position(&self) -> bool {
        self.horizontal_accuracy >= 0.0
    }

    /// Device-reported speed when known
    #[must_use]
    pub fn valid_speed(&self) -> Option<f64> {
        (self.speed >= 0.0).then_some(self.speed)
    }

    /// Great-circle distance to `other` in meters
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }

    /// Seconds elapsed from `earlier` to this fix; negative when this fix is older
    #[must_use]
    pub fn seconds_since(&self, earlier: &Self) -> f64 {
        seconds_between(self.timestamp, earlier.timestamp)
    }

    /// Age of the fix in seconds at `now`
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> f64 {
        seconds_between(now, self.timestamp)
    }
}

/// Signed seconds from `earlier` to `later`, microsecond precision
#[must_use]
pub fn seconds_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |micros| micros as f64 / 1_000_000.0,
    )
}
