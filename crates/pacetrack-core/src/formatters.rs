// ABOUTME: Unit conversions and display strings for distance, time, speed, and pace
// ABOUTME: Includes the minutes'seconds" per kilometer running pace format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Conversions between metric/imperial distance units and time units, and the
//! human readable strings used when reporting session statistics.
//!
//! Pace is the reciprocal of speed. A *normalized* pace is expressed in
//! seconds per meter, which is what [`to_pace`] returns for a speed in m/s.
#![allow(clippy::cast_possible_truncation)] // Safe: values are floored and bounded before casting

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::units::{
    METERS_PER_FOOT, METERS_PER_INCH, METERS_PER_KM, METERS_PER_LEAGUE, METERS_PER_MILE,
    METERS_PER_NAUTICAL_MILE, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};

/// Distance units with their size in meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Meter
    Meter,
    /// Kilometer
    Kilometer,
    /// Inch
    Inch,
    /// Foot
    Foot,
    /// Statute mile
    Mile,
    /// League
    League,
    /// Nautical mile
    NauticalMile,
}

impl DistanceUnit {
    /// Size of one unit in meters
    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::Millimeter => 0.001,
            Self::Centimeter => 0.01,
            Self::Meter => 1.0,
            Self::Kilometer => METERS_PER_KM,
            Self::Inch => METERS_PER_INCH,
            Self::Foot => METERS_PER_FOOT,
            Self::Mile => METERS_PER_MILE,
            Self::League => METERS_PER_LEAGUE,
            Self::NauticalMile => METERS_PER_NAUTICAL_MILE,
        }
    }

    /// Long name
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Millimeter => "millimeter",
            Self::Centimeter => "centimeter",
            Self::Meter => "meter",
            Self::Kilometer => "kilometer",
            Self::Inch => "inch",
            Self::Foot => "feet",
            Self::Mile => "mile",
            Self::League => "league",
            Self::NauticalMile => "nautical mile",
        }
    }

    /// Abbreviation used when printing values
    #[must_use]
    pub const fn short_hand(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::Mile => "mi",
            Self::League => "lea",
            Self::NauticalMile => "n-mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_hand())
    }
}

/// Time units with their size in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Second
    Second,
    /// Minute
    Minute,
    /// Hour
    Hour,
}

impl TimeUnit {
    /// Size of one unit in seconds
    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => SECONDS_PER_MINUTE,
            Self::Hour => SECONDS_PER_HOUR,
        }
    }

    /// Long name
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Second => "seconds",
            Self::Minute => "minutes",
            Self::Hour => "hours",
        }
    }

    /// Abbreviation used when printing values
    #[must_use]
    pub const fn short_hand(self) -> &'static str {
        match self {
            Self::Second => "sec",
            Self::Minute => "min",
            Self::Hour => "h",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_hand())
    }
}

/// Convert a distance expressed in `from` into `to`
#[must_use]
pub fn convert_distance(value: f64, to: DistanceUnit, from: DistanceUnit) -> f64 {
    value * from.meters() / to.meters()
}

/// Convert a duration expressed in `from` into `to`
#[must_use]
pub fn convert_time(value: f64, to: TimeUnit, from: TimeUnit) -> f64 {
    value * from.seconds() / to.seconds()
}

/// Convert a speed in m/s into `distance_unit` per `time_unit`
#[must_use]
pub fn speed_to(speed_mps: f64, distance_unit: DistanceUnit, time_unit: TimeUnit) -> f64 {
    speed_mps * time_unit.seconds() / distance_unit.meters()
}

/// Reciprocal of a speed
#[must_use]
pub fn to_pace(speed: f64) -> f64 {
    1.0 / speed
}

fn with_decimals(value: f64, decimal_places: usize, unit: Option<String>) -> String {
    unit.map_or_else(
        || format!("{value:.decimal_places$}"),
        |unit| format!("{value:.decimal_places$} {unit}"),
    )
}

/// Format a distance, converting from `from` into `unit`
#[must_use]
pub fn format_distance(
    value: f64,
    unit: DistanceUnit,
    from: DistanceUnit,
    decimal_places: usize,
    include_unit: bool,
) -> String {
    with_decimals(
        convert_distance(value, unit, from),
        decimal_places,
        include_unit.then(|| unit.short_hand().to_owned()),
    )
}

/// Format a duration, converting from `from` into `unit`
#[must_use]
pub fn format_time(
    value: f64,
    unit: TimeUnit,
    from: TimeUnit,
    decimal_places: usize,
    include_unit: bool,
) -> String {
    with_decimals(
        convert_time(value, unit, from),
        decimal_places,
        include_unit.then(|| unit.short_hand().to_owned()),
    )
}

/// Format a speed given in m/s as `distance_unit` per `time_unit`
#[must_use]
pub fn format_speed(
    speed_mps: f64,
    distance_unit: DistanceUnit,
    time_unit: TimeUnit,
    decimal_places: usize,
    include_unit: bool,
) -> String {
    with_decimals(
        speed_to(speed_mps, distance_unit, time_unit),
        decimal_places,
        include_unit.then(|| format!("{distance_unit}/{time_unit}")),
    )
}

/// Format the pace that corresponds to a speed given in m/s
///
/// Minutes per kilometer is rendered in the running notation of
/// [`format_running_pace`]; every other combination prints a decimal value.
#[must_use]
pub fn format_pace(
    speed_mps: f64,
    time_unit: TimeUnit,
    distance_unit: DistanceUnit,
    decimal_places: usize,
    include_unit: bool,
) -> String {
    if time_unit == TimeUnit::Minute && distance_unit == DistanceUnit::Kilometer {
        return format_running_pace(to_pace(speed_mps));
    }
    with_decimals(
        to_pace(speed_to(speed_mps, distance_unit, time_unit)),
        decimal_places,
        include_unit.then(|| format!("{time_unit}/{distance_unit}")),
    )
}

/// Format a normalized pace (seconds per meter) as `M'SS"` per kilometer
///
/// Non-positive, NaN or infinite values render as `0'00"`.
#[must_use]
pub fn format_running_pace(pace_sec_per_m: f64) -> String {
    let seconds_per_km = pace_sec_per_m * METERS_PER_KM;
    if seconds_per_km.is_nan() || seconds_per_km <= 0.0 || seconds_per_km.is_infinite() {
        return "0'00\"".to_owned();
    }
    let minutes = (seconds_per_km / SECONDS_PER_MINUTE).floor() as u64;
    let seconds = (seconds_per_km % SECONDS_PER_MINUTE) as u64;
    format!("{minutes}'{seconds:02}\"")
}

/// Format a duration in seconds as `HH:MM:SS`, `MM:SS` or `SS`
#[must_use]
pub fn format_duration_clock(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0);
    let hours = (total / SECONDS_PER_HOUR).floor();
    let minutes = ((total - hours * SECONDS_PER_HOUR) / SECONDS_PER_MINUTE).floor();
    let seconds = (total - minutes * SECONDS_PER_MINUTE - hours * SECONDS_PER_HOUR).floor();
    let (hours, minutes, seconds) = (hours as u64, minutes as u64, seconds as u64);

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else if minutes > 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{seconds:02}")
    }
}
