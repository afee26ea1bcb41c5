// ABOUTME: Broadcast stream of tracking session events for explicitly registered observers
// ABOUTME: Publishes accepted fixes, profile switches, failures and authorization changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use serde::Serialize;
use tokio::sync::broadcast;

use pacetrack_core::errors::TrackerError;
use pacetrack_core::models::Fix;

use crate::profile::TrackingProfile;
use crate::source::AuthorizationStatus;

/// Something observable that happened in a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A batch produced a new last fix
    FixAccepted {
        /// The fix chosen from the batch
        fix: Fix,
        /// Whether it also replaced the best fix
        is_best: bool,
    },
    /// The active profile was replaced
    ProfileChanged {
        /// Profile now active
        profile: TrackingProfile,
    },
    /// The derived battery saving flag flipped
    BatterySavingChanged {
        /// New flag value
        enabled: bool,
    },
    /// The source was started or stopped
    SourceEnabledChanged {
        /// Whether the source is now running
        enabled: bool,
    },
    /// The source reported an acquisition failure
    SourceFailed {
        /// Failure description
        #[serde(serialize_with = "serialize_error")]
        error: TrackerError,
    },
    /// The platform authorization state changed
    AuthorizationChanged {
        /// New state
        status: AuthorizationStatus,
    },
    /// The failsafe timer fired and a single fix was requested
    FailsafeFired,
}

fn serialize_error<S: serde::Serializer>(
    error: &TrackerError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// Fan-out of [`TrackerEvent`]s to any number of subscribers
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<TrackerEvent>,
}

impl SessionEvents {
    /// Create an event stream with the given buffer size
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Register a new observer
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many observers received it
    pub fn publish(&self, event: TrackerEvent) -> usize {
        // No receivers is not an error for a session
        self.sender.send(event).unwrap_or(0)
    }
}
