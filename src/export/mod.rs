// ABOUTME: Export sinks for raw fix batches and recorded routes
// ABOUTME: Structured JSON records round-trip through Fix; GPX is write-only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

mod gpx;
mod records;

pub use gpx::{render_gpx, write_gpx_file};
pub use records::{
    decode_batches, encode_batches, format_timestamp, parse_timestamp, read_records_file,
    write_records_file, CoordinateRecord, FixRecord,
};
