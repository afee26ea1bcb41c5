// ABOUTME: Great-circle distance on a spherical Earth model
// ABOUTME: Used by the quality filter and aggregator to measure displacement between fixes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use crate::constants::units::EARTH_RADIUS_M;

/// Haversine distance between two latitude/longitude pairs, in meters
#[must_use]
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Latitude offset in degrees that spans `meters` along a meridian
#[must_use]
pub fn meridian_offset_deg(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}
