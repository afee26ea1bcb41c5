// ABOUTME: Fix quality filter deciding whether a candidate fix improves on the best known fix
// ABOUTME: Pure functions parameterized by explicit profile thresholds and an explicit "now"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Quality Filter
//!
//! [`assess`] runs the ordered decision rules and reports which rule settled
//! the outcome. [`is_better`] is the boolean form used by the session, and
//! [`select_best`] reduces a raw batch to a single fix.
//!
//! Nothing here reads ambient state: the thresholds come from the profile the
//! caller passes in and the staleness check uses the caller's clock reading.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use pacetrack_core::models::Fix;

use crate::profile::{FilterThresholds, TrackingProfile};

/// Rule that settled a filter decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No previous best fix; the candidate seeds it
    Seed,
    /// Candidate equals the previous best fix
    SameFix,
    /// Candidate carries a negative horizontal accuracy
    InvalidAccuracy,
    /// Candidate is older than the profile's invalid timestamp age
    Stale,
    /// Time delta is below the significantly newer interval
    SignificantlyOlder,
    /// Candidate is significantly less accurate
    SignificantlyLessAccurate,
    /// Candidate is newer and significantly more accurate
    SignificantlyMoreAccurate,
    /// Candidate is significantly newer and more accurate
    SignificantlyNewer,
    /// Candidate is newer and more accurate
    NewerAndMoreAccurate,
    /// Candidate moved less than the significant distance
    BelowDistanceThreshold,
    /// Candidate moved far enough to justify an update
    DistanceUpdate,
    /// Moved far enough but neither newer nor more accurate
    NoImprovement,
}

impl Verdict {
    /// Whether the candidate is accepted
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(
            self,
            Self::Seed
                | Self::SignificantlyMoreAccurate
                | Self::SignificantlyNewer
                | Self::NewerAndMoreAccurate
                | Self::DistanceUpdate
        )
    }

    /// Snake case name used in log fields
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::SameFix => "same_fix",
            Self::InvalidAccuracy => "invalid_accuracy",
            Self::Stale => "stale",
            Self::SignificantlyOlder => "significantly_older",
            Self::SignificantlyLessAccurate => "significantly_less_accurate",
            Self::SignificantlyMoreAccurate => "significantly_more_accurate",
            Self::SignificantlyNewer => "significantly_newer",
            Self::NewerAndMoreAccurate => "newer_and_more_accurate",
            Self::BelowDistanceThreshold => "below_distance_threshold",
            Self::DistanceUpdate => "distance_update",
            Self::NoImprovement => "no_improvement",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deltas between a candidate and the previous best fix
#[derive(Debug, Clone, Copy, PartialEq)]
struct Deltas {
    time_secs: f64,
    distance_m: f64,
    accuracy_m: f64,
}

impl Deltas {
    fn between(candidate: &Fix, previous: &Fix) -> Self {
        Self {
            time_secs: candidate.seconds_since(previous),
            distance_m: candidate.distance_to(previous),
            accuracy_m: candidate.horizontal_accuracy() - previous.horizontal_accuracy(),
        }
    }
}

/// Run the filter rules in order and report the deciding rule
#[must_use]
pub fn assess(
    candidate: &Fix,
    previous_best: Option<&Fix>,
    thresholds: &FilterThresholds,
    now: DateTime<Utc>,
) -> Verdict {
    let Some(previous) = previous_best else {
        return Verdict::Seed;
    };
    if candidate == previous {
        return Verdict::SameFix;
    }
    if !candidate.has_valid_position() {
        return Verdict::InvalidAccuracy;
    }
    if candidate.age_at(now) > thresholds.invalid_timestamp_age_secs {
        return Verdict::Stale;
    }

    let deltas = Deltas::between(candidate, previous);
    let interval = thresholds.significantly_newer_interval_secs;
    let accuracy_change = thresholds.significant_accuracy_change_m;

    let significantly_newer = deltas.time_secs > interval;
    let newer = deltas.time_secs >= 0.0;
    // Compared against the positive interval, so any delta inside it counts.
    let significantly_older = deltas.time_secs < interval;
    let significantly_less_accurate = deltas.accuracy_m > accuracy_change;
    let more_accurate = deltas.accuracy_m < 0.0;
    let significantly_more_accurate = deltas.accuracy_m < -accuracy_change;

    if significantly_older {
        return Verdict::SignificantlyOlder;
    }
    if significantly_less_accurate {
        return Verdict::SignificantlyLessAccurate;
    }
    if significantly_more_accurate && newer {
        return Verdict::SignificantlyMoreAccurate;
    }
    if significantly_newer && more_accurate {
        return Verdict::SignificantlyNewer;
    }
    if newer && more_accurate {
        return Verdict::NewerAndMoreAccurate;
    }

    let needs_distance_update = deltas.distance_m > thresholds.significant_distance_change_m;
    if !needs_distance_update {
        return Verdict::BelowDistanceThreshold;
    }
    if (newer || more_accurate) && !(significantly_older && significantly_less_accurate) {
        Verdict::DistanceUpdate
    } else {
        Verdict::NoImprovement
    }
}

/// Whether `candidate` should replace `previous_best` under `profile`
#[must_use]
pub fn is_better(
    candidate: &Fix,
    previous_best: Option<&Fix>,
    profile: &TrackingProfile,
    now: DateTime<Utc>,
) -> bool {
    assess(candidate, previous_best, &profile.thresholds(), now).is_accepted()
}

/// Reduce a batch to its best fix
///
/// Starts from the first fix and moves to each following fix that is better
/// than the current pick. Returns `None` for an empty batch.
#[must_use]
pub fn select_best(batch: &[Fix], profile: &TrackingProfile, now: DateTime<Utc>) -> Option<Fix> {
    let thresholds = profile.thresholds();
    let (first, rest) = batch.split_first()?;
    Some(rest.iter().fold(*first, |best, fix| {
        if assess(fix, Some(&best), &thresholds, now).is_accepted() {
            *fix
        } else {
            best
        }
    }))
}
