// ABOUTME: Tracking profiles that trade acquisition accuracy against power use
// ABOUTME: Named presets derived from the battery saving flag plus a fully custom variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Tracking Profiles
//!
//! Exactly one [`TrackingProfile`] is active per session. A profile is either
//! one of the named [`ProfilePreset`]s, whose parameters are looked up from a
//! fixed table keyed by the battery saving flag, or a [`TrackingProfile::Custom`]
//! record that is used verbatim.
//!
//! Profiles are plain values. Changing the active profile replaces it wholesale.

mod classify;
mod power;
mod presets;

pub use classify::preset_for_speed;
pub use power::{BatteryStatus, ChargeState, PowerSaveOption};
pub use presets::ProfilePreset;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::SourceConfiguration;

/// Activity hint handed to the location source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityTag {
    /// Pedestrian or cycling fitness activity
    Fitness,
    /// Vehicle navigation
    AutomotiveNavigation,
    /// Non-automotive navigation (boats, trains)
    OtherNavigation,
    /// Unspecified
    Other,
}

/// Accuracy class requested from the location source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredAccuracy {
    /// Highest accuracy with additional sensor fusion
    BestForNavigation,
    /// Best accuracy the hardware provides
    Best,
    /// Within about ten meters
    NearestTenMeters,
    /// Within about a hundred meters
    HundredMeters,
    /// Within about a kilometer
    Kilometer,
    /// Within about three kilometers
    ThreeKilometers,
}

/// Thresholds consumed by the quality filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterThresholds {
    /// Fixes older than this many seconds are stale
    pub invalid_timestamp_age_secs: f64,
    /// A time delta above this many seconds is significantly newer
    pub significantly_newer_interval_secs: f64,
    /// Movement in meters that justifies a position update on its own
    pub significant_distance_change_m: f64,
    /// Accuracy change in meters considered significant
    pub significant_accuracy_change_m: f64,
}

/// Complete parameter record of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileParameters {
    /// Display name
    pub name: String,
    /// Activity hint for the source
    pub activity: ActivityTag,
    /// Whether the source keeps running in the background
    pub allows_background_updates: bool,
    /// Requested accuracy class
    pub desired_accuracy: DesiredAccuracy,
    /// Minimum movement in meters between reported fixes; `None` means no filter
    pub distance_filter_m: Option<f64>,
    /// Quality filter thresholds
    #[serde(flatten)]
    pub thresholds: FilterThresholds,
}

/// The active acquisition profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackingProfile {
    /// Named preset evaluated for a battery saving mode
    Preset {
        /// Which preset
        preset: ProfilePreset,
        /// Battery saving mode the parameters are derived for
        battery_saving: bool,
    },
    /// Explicit parameters, never re-derived
    Custom(ProfileParameters),
}

impl TrackingProfile {
    /// Named preset profile
    #[must_use]
    pub const fn preset(preset: ProfilePreset, battery_saving: bool) -> Self {
        Self::Preset {
            preset,
            battery_saving,
        }
    }

    /// Re-derive a named preset for `battery_saving`; custom profiles are returned unchanged
    #[must_use]
    pub fn with_battery_saving(self, battery_saving: bool) -> Self {
        match self {
            Self::Preset { preset, .. } => Self::preset(preset, battery_saving),
            custom @ Self::Custom(_) => custom,
        }
    }

    /// Named preset, if this is not a custom profile
    #[must_use]
    pub const fn as_preset(&self) -> Option<ProfilePreset> {
        match self {
            Self::Preset { preset, .. } => Some(*preset),
            Self::Custom(_) => None,
        }
    }

    /// Whether this is a custom profile
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Full parameter record
    #[must_use]
    pub fn parameters(&self) -> ProfileParameters {
        match self {
            Self::Preset {
                preset,
                battery_saving,
            } => preset.parameters(*battery_saving),
            Self::Custom(parameters) => parameters.clone(),
        }
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Preset { preset, .. } => preset.name(),
            Self::Custom(parameters) => &parameters.name,
        }
    }

    /// Activity hint
    #[must_use]
    pub const fn activity(&self) -> ActivityTag {
        match self {
            Self::Preset { preset, .. } => preset.activity(),
            Self::Custom(parameters) => parameters.activity,
        }
    }

    /// Whether background updates are allowed
    #[must_use]
    pub const fn allows_background_updates(&self) -> bool {
        match self {
            Self::Preset {
                preset,
                battery_saving,
            } => preset.allows_background_updates(*battery_saving),
            Self::Custom(parameters) => parameters.allows_background_updates,
        }
    }

    /// Requested accuracy class
    #[must_use]
    pub const fn desired_accuracy(&self) -> DesiredAccuracy {
        match self {
            Self::Preset {
                preset,
                battery_saving,
            } => preset.desired_accuracy(*battery_saving),
            Self::Custom(parameters) => parameters.desired_accuracy,
        }
    }

    /// Distance filter in meters
    #[must_use]
    pub const fn distance_filter(&self) -> Option<f64> {
        match self {
            Self::Preset {
                preset,
                battery_saving,
            } => preset.distance_filter(*battery_saving),
            Self::Custom(parameters) => parameters.distance_filter_m,
        }
    }

    /// Quality filter thresholds
    #[must_use]
    pub const fn thresholds(&self) -> FilterThresholds {
        match self {
            Self::Preset { preset, .. } => preset.thresholds(),
            Self::Custom(parameters) => parameters.thresholds,
        }
    }

    /// Settings pushed to the location source when this profile becomes active
    #[must_use]
    pub const fn source_configuration(&self) -> SourceConfiguration {
        SourceConfiguration {
            activity: self.activity(),
            allows_background_updates: self.allows_background_updates(),
            desired_accuracy: self.desired_accuracy(),
            distance_filter_m: self.distance_filter(),
        }
    }
}

impl Default for TrackingProfile {
    fn default() -> Self {
        Self::preset(ProfilePreset::Idle, false)
    }
}

impl From<ProfilePreset> for TrackingProfile {
    fn from(preset: ProfilePreset) -> Self {
        Self::preset(preset, false)
    }
}

impl fmt::Display for TrackingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset {
                preset,
                battery_saving: true,
            } => write!(f, "{preset} (battery saving)"),
            Self::Preset { preset, .. } => write!(f, "{preset}"),
            Self::Custom(parameters) => write!(f, "custom:{}", parameters.name),
        }
    }
}
