// ABOUTME: Interfaces to the external location source, its delegate, and the battery observer
// ABOUTME: Host applications implement these to connect platform sensors to a tracking session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Collaborator Interfaces
//!
//! A [`LocationSource`] is driven by the session: it is configured, started,
//! stopped and asked for single fixes. What it observes flows back through a
//! [`LocationSourceDelegate`], which the session implements.
//!
//! Sources must deliver fixes asynchronously. Calling back into the session
//! from inside one of the [`LocationSource`] methods would wait on the session
//! state that the caller is holding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use pacetrack_core::errors::{TrackerError, TrackerResult};
use pacetrack_core::models::Fix;

use crate::profile::{ActivityTag, BatteryStatus, DesiredAccuracy};

/// Platform authorization state for location access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    /// Access is blocked by policy
    Restricted,
    /// The user refused access
    Denied,
    /// Granted at all times
    AuthorizedAlways,
    /// Granted while the application is in use
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    /// `Some(true)` when granted, `Some(false)` when refused or restricted,
    /// `None` when never prompted
    #[must_use]
    pub const fn has_permission(self) -> Option<bool> {
        match self {
            Self::AuthorizedAlways | Self::AuthorizedWhenInUse => Some(true),
            Self::NotDetermined => None,
            Self::Restricted | Self::Denied => Some(false),
        }
    }

    /// Human readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NotDetermined => "Not determined",
            Self::Restricted => "Restricted",
            Self::Denied => "Denied",
            Self::AuthorizedAlways => "Authorized always",
            Self::AuthorizedWhenInUse => "Authorized when in use",
        }
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Level of access to ask the user for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationLevel {
    /// Access at all times, including in the background
    Always,
    /// Access only while the application is in use
    WhenInUse,
}

/// Acquisition settings pushed to the source as one unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceConfiguration {
    /// Activity hint
    pub activity: ActivityTag,
    /// Whether updates continue in the background
    pub allows_background_updates: bool,
    /// Requested accuracy class
    pub desired_accuracy: DesiredAccuracy,
    /// Minimum movement between reported fixes in meters; `None` reports all
    pub distance_filter_m: Option<f64>,
}

/// Application visibility transitions forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppLifecycle {
    /// The application moved to the background
    Background,
    /// The application became active again
    Foreground,
}

/// Platform location provider driven by a tracking session
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Whether location services are enabled device wide
    fn services_enabled(&self) -> bool;

    /// Current authorization state for this application
    fn authorization(&self) -> AuthorizationStatus;

    /// Apply acquisition settings
    async fn configure(&self, configuration: SourceConfiguration) -> TrackerResult<()>;

    /// Begin continuous updates
    async fn start(&self) -> TrackerResult<()>;

    /// Stop continuous updates
    async fn stop(&self) -> TrackerResult<()>;

    /// Ask for a single fix; it arrives through the delegate
    async fn request_one(&self) -> TrackerResult<()>;

    /// Prompt the user for access
    async fn request_authorization(&self, level: AuthorizationLevel) -> TrackerResult<()>;

    /// Check services and authorization before starting or requesting a fix
    ///
    /// # Errors
    ///
    /// Returns `ServicesDisabled`, `PermissionDenied` or
    /// `PermissionNotDetermined` when the source cannot deliver fixes.
    fn ensure_available(&self) -> TrackerResult<()> {
        if !self.services_enabled() {
            return Err(TrackerError::ServicesDisabled);
        }
        match self.authorization().has_permission() {
            Some(true) => Ok(()),
            Some(false) => Err(TrackerError::PermissionDenied),
            None => Err(TrackerError::PermissionNotDetermined),
        }
    }
}

/// Receiver of what a location source observes
#[async_trait]
pub trait LocationSourceDelegate: Send + Sync {
    /// A batch of raw fixes arrived, oldest first
    async fn on_fix_batch(&self, fixes: Vec<Fix>);

    /// The source failed to acquire a fix
    async fn on_failure(&self, error: TrackerError);

    /// The authorization state changed
    async fn on_authorization_changed(&self, status: AuthorizationStatus);
}

/// Reports battery readings
pub trait BatteryMonitor: Send + Sync {
    /// Latest reading, `None` when unavailable
    fn battery_status(&self) -> Option<BatteryStatus>;
}

/// Battery monitor for hosts without battery information
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBattery;

impl BatteryMonitor for NoBattery {
    fn battery_status(&self) -> Option<BatteryStatus> {
        None
    }
}
