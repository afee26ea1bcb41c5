// ABOUTME: Power save option and battery status used to derive the battery saving flag
// ABOUTME: Auto mode saves battery at low charge unless the battery is full
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pacetrack_core::constants::power::{AUTO_SAVING_MAX_LEVEL, AUTO_SAVING_MIN_LEVEL};
use pacetrack_core::errors::TrackerError;

/// Charging state reported by the battery observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeState {
    /// State not reported
    #[default]
    Unknown,
    /// Running on battery
    Unplugged,
    /// Plugged in and charging
    Charging,
    /// Plugged in and fully charged
    Full,
}

/// Battery reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// Charge level in `0.0..=1.0`; negative when unknown
    pub level: f32,
    /// Charging state
    pub state: ChargeState,
}

impl BatteryStatus {
    /// Create a battery reading
    #[must_use]
    pub const fn new(level: f32, state: ChargeState) -> Self {
        Self { level, state }
    }
}

/// User preference for battery saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSaveOption {
    /// Save battery when the charge is low
    #[default]
    Auto,
    /// Always save battery
    On,
    /// Never save battery
    Off,
}

impl PowerSaveOption {
    /// Derive the battery saving flag
    ///
    /// `Auto` saves battery when the level lies in the low-charge range
    /// (inclusive) and the battery is not full. Without a battery reading
    /// `Auto` does not save.
    #[must_use]
    pub fn battery_saving(self, battery: Option<BatteryStatus>) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Auto => battery.is_some_and(|status| {
                status.state != ChargeState::Full
                    && (AUTO_SAVING_MIN_LEVEL..=AUTO_SAVING_MAX_LEVEL).contains(&status.level)
            }),
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for PowerSaveOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerSaveOption {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "on" | "true" => Ok(Self::On),
            "off" | "false" => Ok(Self::Off),
            other => Err(TrackerError::invalid_config(
                "power_save",
                format!("expected auto, on or off, got '{other}'"),
            )),
        }
    }
}
