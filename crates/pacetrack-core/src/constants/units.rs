// ABOUTME: Unit conversion constants for distance, time, and speed measurements
// ABOUTME: Provides named constants to eliminate magic numbers in calculations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

/// Meters per kilometer conversion factor
pub const METERS_PER_KM: f64 = 1000.0;

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Meters per nautical mile
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// Meters per league (three statute miles)
pub const METERS_PER_LEAGUE: f64 = 4828.032;

/// Meters per foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Seconds per minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
