// ABOUTME: Core types and constants for the pacetrack location tracking engine
// ABOUTME: Foundation crate with the fix model, speed bands, geodesy, formatters, and errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

#![deny(unsafe_code)]

//! # Pacetrack Core
//!
//! Foundation crate providing shared types and constants for the pacetrack
//! location tracking engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `TrackerError` and `ErrorCode`
//! - **constants**: Tracking constants organized by domain
//! - **models**: The `Fix` reading and the static speed band table
//! - **geodesy**: Great-circle distance between coordinates
//! - **formatters**: Distance, time, speed and pace conversions and display strings

/// Unified error handling with stable error codes
pub mod errors;

/// Tracking constants organized by domain
pub mod constants;

/// Core data models (`Fix`, `Coordinate`, `SpeedRange`, `SpeedBand`)
pub mod models;

/// Great-circle distance helpers
pub mod geodesy;

/// Unit conversions and human readable speed, pace and duration strings
pub mod formatters;
