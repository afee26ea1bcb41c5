// ABOUTME: Structured JSON records for raw fix batches, used for debug capture and replay
// ABOUTME: Encodes batches as arrays of camelCase fix objects with millisecond timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use pacetrack_core::constants::export::TIMESTAMP_FORMAT;
use pacetrack_core::errors::{TrackerError, TrackerResult};
use pacetrack_core::models::Fix;

/// Coordinate object inside a record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// One fix as stored in a records file
///
/// Every field is optional on input. A record without a coordinate is
/// skipped; a record missing any other field decodes to a coordinate-only fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRecord {
    /// Position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<CoordinateRecord>,
    /// Horizontal accuracy in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_accuracy: Option<f64>,
    /// Vertical accuracy in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_accuracy: Option<f64>,
    /// Device speed in m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Course in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<f64>,
    /// Timestamp, `yyyy-MM-dd'T'HH:mm:ss.SSS±hhmm`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl FixRecord {
    /// Record for `fix`
    #[must_use]
    pub fn from_fix(fix: &Fix) -> Self {
        Self {
            coordinate: Some(CoordinateRecord {
                latitude: fix.latitude(),
                longitude: fix.longitude(),
            }),
            horizontal_accuracy: Some(fix.horizontal_accuracy()),
            vertical_accuracy: Some(fix.vertical_accuracy()),
            speed: Some(fix.speed()),
            course: Some(fix.course()),
            timestamp: Some(format_timestamp(fix.timestamp())),
            altitude: Some(fix.altitude()),
        }
    }

    /// Decode into a fix, timestamping coordinate-only records with `fallback`
    ///
    /// Returns `None` when the coordinate is missing.
    #[must_use]
    pub fn to_fix(&self, fallback: DateTime<Utc>) -> Option<Fix> {
        let coordinate = self.coordinate?;
        Some(self.full_fix(coordinate).unwrap_or_else(|| {
            Fix::new(coordinate.latitude, coordinate.longitude, fallback)
        }))
    }

    fn full_fix(&self, coordinate: CoordinateRecord) -> Option<Fix> {
        let timestamp = parse_timestamp(self.timestamp.as_deref()?).ok()?;
        Some(
            Fix::new(coordinate.latitude, coordinate.longitude, timestamp)
                .with_horizontal_accuracy(self.horizontal_accuracy?)
                .with_vertical_accuracy(self.vertical_accuracy?)
                .with_speed(self.speed?)
                .with_course(self.course?)
                .with_altitude(self.altitude?),
        )
    }
}

/// Render a timestamp in the records format, in UTC
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a records timestamp; RFC 3339 is accepted as well
///
/// # Errors
///
/// Returns `Serialization` when the text matches neither format
pub fn parse_timestamp(text: &str) -> TrackerResult<DateTime<Utc>> {
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| TrackerError::Serialization(format!("invalid timestamp '{text}': {e}")))
}

/// Encode batches as a pretty-printed JSON array of record arrays
///
/// # Errors
///
/// Returns `Serialization` if encoding fails
pub fn encode_batches(batches: &[Vec<Fix>]) -> TrackerResult<String> {
    let records: Vec<Vec<FixRecord>> = batches
        .iter()
        .map(|batch| batch.iter().map(FixRecord::from_fix).collect())
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Decode batches; records without a coordinate are dropped
///
/// # Errors
///
/// Returns `Serialization` if the text is not an array of record arrays
pub fn decode_batches(json: &str, fallback: DateTime<Utc>) -> TrackerResult<Vec<Vec<Fix>>> {
    let records: Vec<Vec<FixRecord>> = serde_json::from_str(json)?;
    let batches: Vec<Vec<Fix>> = records
        .iter()
        .map(|batch| {
            batch
                .iter()
                .filter_map(|record| record.to_fix(fallback))
                .collect()
        })
        .collect();
    debug!(batches = batches.len(), "Decoded fix records");
    Ok(batches)
}

/// Write batches to a records file
///
/// # Errors
///
/// Returns `Serialization` or `Io` on failure
pub fn write_records_file(path: &Path, batches: &[Vec<Fix>]) -> TrackerResult<()> {
    let json = encode_batches(batches)?;
    fs::write(path, json)?;
    info!(path = %path.display(), batches = batches.len(), "Wrote fix records");
    Ok(())
}

/// Read batches from a records file
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Serialization` if it is malformed
pub fn read_records_file(path: &Path, fallback: DateTime<Utc>) -> TrackerResult<Vec<Vec<Fix>>> {
    let json = fs::read_to_string(path)?;
    decode_batches(&json, fallback)
}
