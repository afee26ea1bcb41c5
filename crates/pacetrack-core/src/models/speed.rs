// ABOUTME: Speed ranges and the static, ordered speed band table
// ABOUTME: Bands are consulted only for their minimum speed during classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::speed_bands::{
    CYCLE_MAX, CYCLE_MIN, DRIVE_MAX, DRIVE_MIN, JOG_MAX, JOG_MIN, RUN_MAX, RUN_MIN, SPEEDING_MAX,
    SPEEDING_MIN, WALK_MAX, WALK_MIN,
};

/// Closed range of speeds in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    /// Lower bound (m/s)
    pub min_speed: f64,
    /// Upper bound (m/s)
    pub max_speed: f64,
}

impl SpeedRange {
    /// Create a speed range
    #[must_use]
    pub const fn new(min_speed: f64, max_speed: f64) -> Self {
        Self {
            min_speed,
            max_speed,
        }
    }

    /// Midpoint of the range
    #[must_use]
    pub fn avg_speed(&self) -> f64 {
        (self.min_speed + self.max_speed) / 2.0
    }

    /// Whether `speed` lies inside the range, bounds included
    #[must_use]
    pub fn contains(&self, speed: f64) -> bool {
        (self.min_speed..=self.max_speed).contains(&speed)
    }
}

/// Named motion bands, ordered from slowest to fastest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBand {
    /// Walking pace
    Walk,
    /// Jogging pace
    Jog,
    /// Running pace
    Run,
    /// Cycling speed
    Cycle,
    /// Driving speed
    Drive,
    /// Above highway speed
    Speeding,
}

/// Static band table, slowest first. Cycle and run overlap numerically.
pub const SPEED_BANDS: [(SpeedBand, SpeedRange); 6] = [
    (SpeedBand::Walk, SpeedRange::new(WALK_MIN, WALK_MAX)),
    (SpeedBand::Jog, SpeedRange::new(JOG_MIN, JOG_MAX)),
    (SpeedBand::Run, SpeedRange::new(RUN_MIN, RUN_MAX)),
    (SpeedBand::Cycle, SpeedRange::new(CYCLE_MIN, CYCLE_MAX)),
    (SpeedBand::Drive, SpeedRange::new(DRIVE_MIN, DRIVE_MAX)),
    (SpeedBand::Speeding, SpeedRange::new(SPEEDING_MIN, SPEEDING_MAX)),
];

impl SpeedBand {
    /// Range covered by this band
    #[must_use]
    pub const fn range(self) -> SpeedRange {
        match self {
            Self::Walk => SPEED_BANDS[0].1,
            Self::Jog => SPEED_BANDS[1].1,
            Self::Run => SPEED_BANDS[2].1,
            Self::Cycle => SPEED_BANDS[3].1,
            Self::Drive => SPEED_BANDS[4].1,
            Self::Speeding => SPEED_BANDS[5].1,
        }
    }

    /// Bands in classification order, fastest first
    pub fn fastest_first() -> impl Iterator<Item = Self> {
        SPEED_BANDS.iter().rev().map(|(band, _)| *band)
    }

    /// Short lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Jog => "jog",
            Self::Run => "run",
            Self::Cycle => "cycle",
            Self::Drive => "drive",
            Self::Speeding => "speeding",
        }
    }
}

impl fmt::Display for SpeedBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
