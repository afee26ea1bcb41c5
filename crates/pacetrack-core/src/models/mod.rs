// ABOUTME: Core data models for geolocation fixes and speed classification bands
// ABOUTME: Re-exports Fix, Coordinate, SpeedRange, SpeedBand and the static band table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

/// Geolocation fix reading and coordinate types
pub mod fix;
/// Speed ranges and the static speed band table
pub mod speed;

pub use fix::{seconds_between, Coordinate, Fix};
pub use speed::{SpeedBand, SpeedRange, SPEED_BANDS};
