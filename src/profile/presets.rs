// ABOUTME: Fixed parameter table for the named tracking profile presets
// ABOUTME: Each preset derives its acquisition and filter parameters from the battery saving flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pacetrack_core::errors::TrackerError;
use pacetrack_core::models::SpeedBand;

use super::{ActivityTag, DesiredAccuracy, FilterThresholds, ProfileParameters};

/// Named acquisition presets, slowest motion first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilePreset {
    /// Stationary or barely moving
    Idle,
    /// Walking
    Walk,
    /// Jogging
    Jog,
    /// Running
    Run,
    /// Cycling
    Cycle,
    /// Driving
    Drive,
    /// Travelling above highway speed
    Speeding,
}

impl ProfilePreset {
    /// All presets, slowest first
    pub const ALL: [Self; 7] = [
        Self::Idle,
        Self::Walk,
        Self::Jog,
        Self::Run,
        Self::Cycle,
        Self::Drive,
        Self::Speeding,
    ];

    /// Preset that corresponds to a motion band
    #[must_use]
    pub const fn from_band(band: SpeedBand) -> Self {
        match band {
            SpeedBand::Walk => Self::Walk,
            SpeedBand::Jog => Self::Jog,
            SpeedBand::Run => Self::Run,
            SpeedBand::Cycle => Self::Cycle,
            SpeedBand::Drive => Self::Drive,
            SpeedBand::Speeding => Self::Speeding,
        }
    }

    /// Lowercase preset name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jog => "jog",
            Self::Run => "run",
            Self::Cycle => "cycle",
            Self::Drive => "drive",
            Self::Speeding => "speeding",
        }
    }

    /// Activity hint passed to the location source
    #[must_use]
    pub const fn activity(self) -> ActivityTag {
        match self {
            Self::Drive | Self::Speeding => ActivityTag::AutomotiveNavigation,
            _ => ActivityTag::Fitness,
        }
    }

    /// Background updates are only allowed while not saving battery
    #[must_use]
    pub const fn allows_background_updates(self, battery_saving: bool) -> bool {
        match self {
            Self::Idle
            | Self::Walk
            | Self::Jog
            | Self::Run
            | Self::Cycle
            | Self::Drive
            | Self::Speeding => !battery_saving,
        }
    }

    /// Accuracy requested from the location source
    #[must_use]
    pub const fn desired_accuracy(self, battery_saving: bool) -> DesiredAccuracy {
        match (self, battery_saving) {
            (Self::Idle | Self::Walk | Self::Jog | Self::Run, false) => DesiredAccuracy::Best,
            (Self::Idle | Self::Walk | Self::Jog | Self::Run, true)
            | (Self::Cycle, false) => DesiredAccuracy::NearestTenMeters,
            (Self::Cycle, true) => DesiredAccuracy::HundredMeters,
            (Self::Drive | Self::Speeding, _) => DesiredAccuracy::BestForNavigation,
        }
    }

    /// Minimum horizontal movement in meters before the source reports a fix;
    /// `None` reports every movement
    #[must_use]
    pub const fn distance_filter(self, battery_saving: bool) -> Option<f64> {
        match (self, battery_saving) {
            (Self::Idle | Self::Walk, false) => None,
            (Self::Idle, true) => Some(1.5),
            (Self::Walk, true) => Some(3.0),
            (Self::Jog, false) => Some(2.0),
            (Self::Jog, true) => Some(4.0),
            (Self::Run, false) => Some(3.0),
            (Self::Run, true) => Some(5.0),
            (Self::Cycle, false) => Some(10.0),
            (Self::Cycle, true) => Some(20.0),
            (Self::Drive, false) => Some(30.0),
            (Self::Drive, true) | (Self::Speeding, false) => Some(50.0),
            (Self::Speeding, true) => Some(100.0),
        }
    }

    /// Filter thresholds; these do not depend on battery saving
    #[must_use]
    pub const fn thresholds(self) -> FilterThresholds {
        let (invalid_timestamp_age_secs, significantly_newer_interval_secs, significant_distance_m) =
            match self {
                Self::Idle => (300.0, 30.0, 0.5),
                Self::Walk => (150.0, 15.0, 1.0),
                Self::Jog => (100.0, 10.0, 2.0),
                Self::Run => (60.0, 6.0, 3.0),
                Self::Cycle => (50.0, 5.0, 10.0),
                Self::Drive => (20.0, 2.0, 50.0),
                Self::Speeding => (10.0, 1.0, 100.0),
            };
        FilterThresholds {
            invalid_timestamp_age_secs,
            significantly_newer_interval_secs,
            significant_distance_change_m: significant_distance_m,
            significant_accuracy_change_m: 10.0,
        }
    }

    /// Full parameter record for this preset
    #[must_use]
    pub fn parameters(self, battery_saving: bool) -> ProfileParameters {
        ProfileParameters {
            name: self.name().to_owned(),
            activity: self.activity(),
            allows_background_updates: self.allows_background_updates(battery_saving),
            desired_accuracy: self.desired_accuracy(battery_saving),
            distance_filter_m: self.distance_filter(battery_saving),
            thresholds: self.thresholds(),
        }
    }
}

impl fmt::Display for ProfilePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfilePreset {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                TrackerError::invalid_config("profile", format!("unknown profile preset '{value}'"))
            })
    }
}
