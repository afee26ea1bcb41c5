// ABOUTME: Unified error types for location tracking, configuration and export failures
// ABOUTME: Defines TrackerError, stable ErrorCode values, and the TrackerResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Unified Error Handling
//!
//! Every fallible operation in the workspace reports a [`TrackerError`]. The
//! authorization errors are reported to the immediate caller (enable,
//! single-fix request) or routed to a pending single-fix completion; none of
//! them are fatal to a tracking session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Stable error codes, usable across FFI and log aggregation boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authorization (0-99), numbering kept stable for host applications
    #[serde(rename = "PERMISSION_NOT_DETERMINED")]
    PermissionNotDetermined = 0,
    #[serde(rename = "SERVICES_DISABLED")]
    ServicesDisabled = 1,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 2,

    // Acquisition (100-199)
    #[serde(rename = "SOURCE_FAILURE")]
    SourceFailure = 100,

    // Configuration (200-299)
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 200,

    // Export (300-399)
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 300,
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 301,
    #[serde(rename = "EMPTY_TRACK")]
    EmptyTrack = 302,
}

impl ErrorCode {
    /// Numeric value of this code
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PermissionNotDetermined => {
                "The user hasn't been prompted to grant location access yet"
            }
            Self::ServicesDisabled => "Location services are disabled for all apps",
            Self::PermissionDenied => "Location services are disabled for this application",
            Self::SourceFailure => "The location source failed to acquire a fix",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::StorageError => "Storage operation failed",
            Self::EmptyTrack => "There are no fixes to export",
        }
    }

    /// Whether the error is one of the three authorization/service states
    #[must_use]
    pub const fn is_authorization(self) -> bool {
        matches!(
            self,
            Self::PermissionNotDetermined | Self::ServicesDisabled | Self::PermissionDenied
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Unified error type for the tracking engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Location capability is switched off platform-wide
    #[error("Location services are disabled for all apps")]
    ServicesDisabled,

    /// The user explicitly refused location access
    #[error("Location services are disabled for this application")]
    PermissionDenied,

    /// The user has never been prompted for location access
    #[error("The user hasn't been prompted to grant permission for location services access")]
    PermissionNotDetermined,

    /// Transient acquisition failure reported by the location source
    #[error("Location source failure: {cause}")]
    SourceFailure {
        /// Description of the underlying failure
        cause: String,
    },

    /// A configuration value could not be parsed or is out of range
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Export record encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reading or writing an export file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// An export was requested for an empty fix list
    #[error("There are no fixes to export")]
    EmptyTrack,
}

impl TrackerError {
    /// Create a source failure error
    #[must_use]
    pub fn source_failure(cause: impl Into<String>) -> Self {
        Self::SourceFailure {
            cause: cause.into(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ServicesDisabled => ErrorCode::ServicesDisabled,
            Self::PermissionDenied => ErrorCode::PermissionDenied,
            Self::PermissionNotDetermined => ErrorCode::PermissionNotDetermined,
            Self::SourceFailure { .. } => ErrorCode::SourceFailure,
            Self::InvalidConfig { .. } => ErrorCode::ConfigInvalid,
            Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Io(_) => ErrorCode::StorageError,
            Self::EmptyTrack => ErrorCode::EmptyTrack,
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<io::Error> for TrackerError {
    fn from(error: io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Result type used throughout the workspace
pub type TrackerResult<T> = Result<T, TrackerError>;
