// ABOUTME: Common benchmark utilities and fixtures for tracking performance measurements
// ABOUTME: Provides reusable track generators for Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! Common benchmark utilities and fixtures.

pub mod fixtures;
