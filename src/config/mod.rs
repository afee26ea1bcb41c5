// ABOUTME: Tracker configuration loaded from environment variables with documented defaults
// ABOUTME: Covers failsafe timing, classification window, automatic profiles and power saving
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Configuration for tracking sessions
//!
//! | Variable | Default |
//! |---|---|
//! | `PACETRACK_FAILSAFE_SECS` | `10` |
//! | `PACETRACK_CLASSIFICATION_WINDOW_SECS` | `10` |
//! | `PACETRACK_AUTO_PROFILE` | `true` |
//! | `PACETRACK_POWER_SAVE` | `auto` |
//! | `PACETRACK_INITIAL_PROFILE` | `idle` |
//! | `PACETRACK_EVENT_BUFFER` | `64` |

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use pacetrack_core::constants::session::{
    CLASSIFICATION_WINDOW_SECS, EVENT_BUFFER_SIZE, FAILSAFE_INTERVAL_SECS,
};
use pacetrack_core::errors::{TrackerError, TrackerResult};

use crate::profile::{PowerSaveOption, ProfilePreset};

/// Environment variable names
pub mod keys {
    /// Failsafe timer interval in seconds
    pub const FAILSAFE_SECS: &str = "PACETRACK_FAILSAFE_SECS";
    /// Classification window in seconds
    pub const CLASSIFICATION_WINDOW_SECS: &str = "PACETRACK_CLASSIFICATION_WINDOW_SECS";
    /// Automatic profile change toggle
    pub const AUTO_PROFILE: &str = "PACETRACK_AUTO_PROFILE";
    /// Power save option
    pub const POWER_SAVE: &str = "PACETRACK_POWER_SAVE";
    /// Profile preset active when a session starts
    pub const INITIAL_PROFILE: &str = "PACETRACK_INITIAL_PROFILE";
    /// Session event broadcast buffer
    pub const EVENT_BUFFER: &str = "PACETRACK_EVENT_BUFFER";
}

/// Settings for a tracking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Silence after a successful batch before a single fix is re-requested
    pub failsafe_interval: Duration,
    /// Trailing window for automatic classification, in seconds
    pub classification_window_secs: f64,
    /// Whether the profile follows the observed speed
    pub automatic_profile_change: bool,
    /// Battery saving preference
    pub power_save: PowerSaveOption,
    /// Preset active when the session is created
    pub initial_profile: ProfilePreset,
    /// Capacity of the session event channel
    pub event_buffer: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            failsafe_interval: Duration::from_secs(FAILSAFE_INTERVAL_SECS),
            classification_window_secs: CLASSIFICATION_WINDOW_SECS,
            automatic_profile_change: true,
            power_save: PowerSaveOption::Auto,
            initial_profile: ProfilePreset::Idle,
            event_buffer: EVENT_BUFFER_SIZE,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first variable that fails to parse
    pub fn from_env() -> TrackerResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first key that fails to parse
    pub fn from_lookup<F>(lookup: F) -> TrackerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let failsafe_secs: f64 = parse_or(
            &lookup,
            keys::FAILSAFE_SECS,
            defaults.failsafe_interval.as_secs_f64(),
        )?;
        if !failsafe_secs.is_finite() || failsafe_secs <= 0.0 {
            return Err(TrackerError::invalid_config(
                keys::FAILSAFE_SECS,
                "must be a positive number of seconds",
            ));
        }

        let classification_window_secs: f64 = parse_or(
            &lookup,
            keys::CLASSIFICATION_WINDOW_SECS,
            defaults.classification_window_secs,
        )?;
        if !classification_window_secs.is_finite() || classification_window_secs <= 0.0 {
            return Err(TrackerError::invalid_config(
                keys::CLASSIFICATION_WINDOW_SECS,
                "must be a positive number of seconds",
            ));
        }

        let event_buffer: usize = parse_or(&lookup, keys::EVENT_BUFFER, defaults.event_buffer)?;
        if event_buffer == 0 {
            return Err(TrackerError::invalid_config(
                keys::EVENT_BUFFER,
                "must be at least 1",
            ));
        }

        let config = Self {
            failsafe_interval: Duration::from_secs_f64(failsafe_secs),
            classification_window_secs,
            automatic_profile_change: parse_or(
                &lookup,
                keys::AUTO_PROFILE,
                defaults.automatic_profile_change,
            )?,
            power_save: parse_or(&lookup, keys::POWER_SAVE, defaults.power_save)?,
            initial_profile: parse_or(&lookup, keys::INITIAL_PROFILE, defaults.initial_profile)?,
            event_buffer,
        };

        debug!(
            failsafe_secs = config.failsafe_interval.as_secs_f64(),
            classification_window_secs = config.classification_window_secs,
            automatic_profile_change = config.automatic_profile_change,
            power_save = %config.power_save,
            initial_profile = %config.initial_profile,
            "Tracker configuration loaded"
        );

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> TrackerResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| TrackerError::invalid_config(key, format!("'{raw}': {e}"))),
    }
}
