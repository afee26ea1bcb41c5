// ABOUTME: Picks a profile preset from an observed speed using the speed band table
// ABOUTME: Bands are tested fastest first and the first exceeded minimum wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use pacetrack_core::models::SpeedBand;

use super::ProfilePreset;

/// Preset for a speed in m/s; idle when no band minimum is exceeded
#[must_use]
pub fn preset_for_speed(speed_mps: f64) -> ProfilePreset {
    SpeedBand::fastest_first()
        .find(|band| speed_mps > band.range().min_speed)
        .map_or(ProfilePreset::Idle, ProfilePreset::from_band)
}
