// ABOUTME: Speed band boundaries used to classify observed motion
// ABOUTME: Values are meters per second; comments give the equivalent pace or km/h
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

/// Walking lower bound
pub const WALK_MIN: f64 = 0.33;
/// Walking upper bound
pub const WALK_MAX: f64 = 1.58;

/// Jogging, 10'00" - 6'00" per km
pub const JOG_MIN: f64 = 1.58;
/// Jogging upper bound
pub const JOG_MAX: f64 = 3.02;

/// Running, 6'00" - 3'30" per km
pub const RUN_MIN: f64 = 3.02;
/// Running upper bound
pub const RUN_MAX: f64 = 4.76;

/// Cycling, 10 - 30 km/h. Overlaps the running band.
pub const CYCLE_MIN: f64 = 2.77;
/// Cycling upper bound
pub const CYCLE_MAX: f64 = 8.33;

/// Driving, 30 - 100 km/h
pub const DRIVE_MIN: f64 = 8.33;
/// Driving upper bound
pub const DRIVE_MAX: f64 = 27.78;

/// Speeding, 100 - 300 km/h
pub const SPEEDING_MIN: f64 = 27.78;
/// Speeding upper bound
pub const SPEEDING_MAX: f64 = 83.34;
