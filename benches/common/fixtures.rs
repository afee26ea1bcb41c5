// ABOUTME: Benchmark fixtures generating deterministic fix tracks and raw batches
// ABOUTME: Tracks alternate accuracy and speed so every filter rule is exercised
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Deterministic track generation for reproducible measurements.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pacetrack::geodesy::meridian_offset_deg;
use pacetrack::models::Fix;

/// Predefined track lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum TrackSize {
    /// A ten minute jog at one fix per second
    Short,
    /// A two hour ride at one fix per second
    Long,
}

impl TrackSize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Short => 600,
            Self::Long => 7_200,
        }
    }
}

/// Fixed start instant so runs are comparable
#[must_use]
pub fn track_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Northbound track with speed and accuracy varying per fix
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn generate_track(size: TrackSize) -> Vec<Fix> {
    let start = track_start();
    let mut travelled = 0.0;
    (0..size.count())
        .map(|index| {
            let speed = 2.0 + (index % 7) as f64 * 0.4;
            let accuracy = 4.0 + (index % 5) as f64 * 6.0;
            travelled += speed;
            Fix::new(
                meridian_offset_deg(travelled),
                0.0,
                start + Duration::seconds(index as i64),
            )
            .with_horizontal_accuracy(accuracy)
            .with_speed(speed)
        })
        .collect()
}

/// Split a track into raw batches of `batch_len` fixes
#[must_use]
pub fn batches(track: &[Fix], batch_len: usize) -> Vec<Vec<Fix>> {
    track.chunks(batch_len.max(1)).map(<[Fix]>::to_vec).collect()
}
