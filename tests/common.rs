// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a recording mock location source, fix builders and test logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pacetrack`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Mutex, Once};

use pacetrack::errors::{TrackerError, TrackerResult};
use pacetrack::geodesy::meridian_offset_deg;
use pacetrack::models::Fix;
use pacetrack::source::{
    AuthorizationLevel, AuthorizationStatus, LocationSource, SourceConfiguration,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fixed reference instant used across tests
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap()
}

/// `base_time()` plus `seconds`
pub fn at(seconds: i64) -> DateTime<Utc> {
    base_time() + Duration::seconds(seconds)
}

/// Fix `meters_north` of the origin (0, 0) at `base_time() + seconds`
pub fn fix_north(meters_north: f64, seconds: i64, accuracy: f64) -> Fix {
    Fix::new(meridian_offset_deg(meters_north), 0.0, at(seconds)).with_horizontal_accuracy(accuracy)
}

/// Straight northbound track at constant speed, one fix per second
pub fn straight_track(count: usize, speed_mps: f64, accuracy: f64) -> Vec<Fix> {
    (0..count)
        .map(|i| {
            let seconds = i64::try_from(i).unwrap();
            fix_north(speed_mps * seconds as f64, seconds, accuracy).with_speed(speed_mps)
        })
        .collect()
}

/// Calls recorded by [`MockSource`]
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Configure(SourceConfiguration),
    Start,
    Stop,
    RequestOne,
    RequestAuthorization(AuthorizationLevel),
}

/// Location source that records every call and never delivers fixes itself
#[derive(Debug)]
pub struct MockSource {
    services_enabled: Mutex<bool>,
    authorization: Mutex<AuthorizationStatus>,
    fail_request_one: Mutex<Option<TrackerError>>,
    fail_configure: Mutex<Option<TrackerError>>,
    calls: Mutex<Vec<SourceCall>>,
}

impl MockSource {
    /// Enabled services with the given authorization
    pub fn new(authorization: AuthorizationStatus) -> Self {
        Self {
            services_enabled: Mutex::new(true),
            authorization: Mutex::new(authorization),
            fail_request_one: Mutex::new(None),
            fail_configure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Enabled services, authorized always
    pub fn authorized() -> Self {
        Self::new(AuthorizationStatus::AuthorizedAlways)
    }

    pub fn set_services_enabled(&self, enabled: bool) {
        *self.services_enabled.lock().unwrap() = enabled;
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        *self.authorization.lock().unwrap() = status;
    }

    pub fn fail_request_one_with(&self, error: TrackerError) {
        *self.fail_request_one.lock().unwrap() = Some(error);
    }

    /// Reject the next `configure` call only
    pub fn fail_next_configure_with(&self, error: TrackerError) {
        *self.fail_configure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &SourceCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn request_one_count(&self) -> usize {
        self.count(&SourceCall::RequestOne)
    }

    pub fn configurations(&self) -> Vec<SourceConfiguration> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::Configure(configuration) => Some(configuration),
                _ => None,
            })
            .collect()
    }

    pub fn last_configuration(&self) -> Option<SourceConfiguration> {
        self.configurations().pop()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LocationSource for MockSource {
    fn services_enabled(&self) -> bool {
        *self.services_enabled.lock().unwrap()
    }

    fn authorization(&self) -> AuthorizationStatus {
        *self.authorization.lock().unwrap()
    }

    async fn configure(&self, configuration: SourceConfiguration) -> TrackerResult<()> {
        self.record(SourceCall::Configure(configuration));
        match self.fail_configure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn start(&self) -> TrackerResult<()> {
        self.record(SourceCall::Start);
        Ok(())
    }

    async fn stop(&self) -> TrackerResult<()> {
        self.record(SourceCall::Stop);
        Ok(())
    }

    async fn request_one(&self) -> TrackerResult<()> {
        self.record(SourceCall::RequestOne);
        match self.fail_request_one.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn request_authorization(&self, level: AuthorizationLevel) -> TrackerResult<()> {
        self.record(SourceCall::RequestAuthorization(level));
        Ok(())
    }
}
