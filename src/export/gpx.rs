// ABOUTME: GPX 1.0 route track rendering of accepted fixes as ordered waypoints
// ABOUTME: Waypoints carry name, speed, elevation and time, sorted by timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

use pacetrack_core::constants::export::GPX_CREATOR;
use pacetrack_core::errors::{TrackerError, TrackerResult};
use pacetrack_core::models::Fix;

use super::records::format_timestamp;

const GPX_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<gpx xmlns=\"http://www.topografix.com/GPX/1/0\" version=\"1.0\" ",
    "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
    "xsi:schemaLocation=\"http://www.topografix.com/GPX/1/0 http://www.topografix.com/GPX/1/0/gpx.xsd\""
);

/// Render `fixes` as a GPX 1.0 document, oldest first
///
/// Waypoint children follow the schema order: `ele`, `time`, `speed`, `name`.
///
/// # Errors
///
/// Returns `EmptyTrack` when `fixes` is empty
pub fn render_gpx(fixes: &[Fix]) -> TrackerResult<String> {
    if fixes.is_empty() {
        return Err(TrackerError::EmptyTrack);
    }
    let mut sorted = fixes.to_vec();
    sorted.sort_by_key(Fix::timestamp);

    let mut document = format!("{GPX_HEADER} creator=\"{GPX_CREATOR}\">\n");
    for (index, fix) in sorted.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write!(
            document,
            concat!(
                "<wpt lat=\"{lat}\" lon=\"{lon}\">\n",
                "   <ele>{ele}</ele>\n",
                "   <time>{time}</time>\n",
                "   <speed>{speed}</speed>\n",
                "   <name>WP{index:03}</name>\n",
                "</wpt>\n"
            ),
            lat = fix.latitude(),
            lon = fix.longitude(),
            index = index,
            speed = fix.speed(),
            ele = fix.altitude(),
            time = format_timestamp(fix.timestamp()),
        );
    }
    document.push_str("</gpx>\n");
    Ok(document)
}

/// Write a GPX document for `fixes` to `path`
///
/// # Errors
///
/// Returns `EmptyTrack` or `Io` on failure
pub fn write_gpx_file(path: &Path, fixes: &[Fix]) -> TrackerResult<()> {
    let document = render_gpx(fixes)?;
    fs::write(path, document)?;
    info!(path = %path.display(), waypoints = fixes.len(), "Wrote route track");
    Ok(())
}
