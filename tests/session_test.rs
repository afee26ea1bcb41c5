// ABOUTME: Integration tests for the tracking session controller
// ABOUTME: Covers enabling, batch handling, single fix requests, failsafe timer, profiles and power
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{at, base_time, fix_north, init_test_logging, MockSource, SourceCall};
use pacetrack::aggregator::MetadataWindow;
use pacetrack::clock::ManualClock;
use pacetrack::config::TrackerConfig;
use pacetrack::errors::{TrackerError, TrackerResult};
use pacetrack::models::Fix;
use pacetrack::profile::{
    ActivityTag, BatteryStatus, ChargeState, DesiredAccuracy, FilterThresholds, PowerSaveOption,
    ProfileParameters, ProfilePreset, TrackingProfile,
};
use pacetrack::session::{SingleFixCompletion, TrackerEvent, TrackingSession};
use pacetrack::source::{AppLifecycle, AuthorizationLevel, AuthorizationStatus, LocationSourceDelegate};

type Outcomes = Arc<Mutex<Vec<TrackerResult<Fix>>>>;

struct Harness {
    source: Arc<MockSource>,
    clock: Arc<ManualClock>,
    session: TrackingSession,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    fn with_config(config: TrackerConfig) -> Self {
        Self::with_source(MockSource::authorized(), config)
    }

    fn with_source(source: MockSource, config: TrackerConfig) -> Self {
        init_test_logging();
        let source = Arc::new(source);
        let clock = Arc::new(ManualClock::new(base_time()));
        let session = TrackingSession::builder(source.clone())
            .clock(clock.clone())
            .config(config)
            .build();
        Self {
            source,
            clock,
            session,
        }
    }

    /// Deliver a batch with the clock positioned at its newest fix
    async fn deliver(&self, batch: Vec<Fix>) {
        if let Some(newest) = batch.iter().map(Fix::timestamp).max() {
            self.clock.set(newest);
        }
        self.session.handle_fix_batch(batch).await;
    }
}

fn recording_completion() -> (SingleFixCompletion, Outcomes) {
    let outcomes: Outcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = outcomes.clone();
    let completion: SingleFixCompletion = Box::new(move |result| {
        sink.lock().unwrap().push(result);
    });
    (completion, outcomes)
}

fn manual_profile_config() -> TrackerConfig {
    TrackerConfig {
        automatic_profile_change: false,
        ..TrackerConfig::default()
    }
}

// ============================================================================
// Enabling
// ============================================================================

#[tokio::test]
async fn test_enable_reports_authorization_errors() {
    let cases = [
        (true, AuthorizationStatus::NotDetermined, TrackerError::PermissionNotDetermined),
        (true, AuthorizationStatus::Denied, TrackerError::PermissionDenied),
        (true, AuthorizationStatus::Restricted, TrackerError::PermissionDenied),
        (false, AuthorizationStatus::AuthorizedAlways, TrackerError::ServicesDisabled),
    ];

    for (services, status, expected) in cases {
        let source = MockSource::new(status);
        source.set_services_enabled(services);
        let harness = Harness::with_source(source, TrackerConfig::default());

        let error = harness.session.set_enabled(true).await.unwrap_err();
        assert_eq!(error, expected);
        assert!(!harness.session.is_enabled().await);
        assert_eq!(harness.source.count(&SourceCall::Start), 0);
    }
}

#[tokio::test]
async fn test_enable_configures_then_starts_once() {
    let harness = Harness::new();
    harness.session.set_enabled(true).await.unwrap();
    harness.session.set_enabled(true).await.unwrap();

    let calls = harness.source.calls();
    assert_eq!(
        calls,
        vec![
            SourceCall::Configure(TrackingProfile::default().source_configuration()),
            SourceCall::Start,
        ]
    );
    assert!(harness.session.is_enabled().await);
}

#[tokio::test]
async fn test_disable_stops_once() {
    let harness = Harness::new();
    harness.session.set_enabled(false).await.unwrap();
    assert_eq!(harness.source.count(&SourceCall::Stop), 0);

    harness.session.set_enabled(true).await.unwrap();
    harness.session.set_enabled(false).await.unwrap();
    harness.session.set_enabled(false).await.unwrap();
    assert_eq!(harness.source.count(&SourceCall::Stop), 1);
    assert!(!harness.session.is_enabled().await);
}

// ============================================================================
// Batches
// ============================================================================

#[tokio::test]
async fn test_batch_appends_single_best_fix() {
    let harness = Harness::with_config(manual_profile_config());
    let rough = fix_north(0.0, 0, 60.0);
    let sharp = fix_north(1.0, 30, 4.0);
    harness.deliver(vec![rough, sharp]).await;

    let history = harness.session.history().await;
    assert_eq!(history.as_slice(), &[sharp]);
    assert_eq!(harness.session.last_fix().await, Some(sharp));
    assert_eq!(harness.session.best_fix().await, Some(sharp));
}

#[tokio::test]
async fn test_best_fix_only_moves_on_improvement() {
    let harness = Harness::with_config(manual_profile_config());
    let good = fix_north(0.0, 0, 5.0);
    // Idle profile: 10 seconds is inside the 30 second interval
    let worse = fix_north(2.0, 10, 40.0);

    harness.deliver(vec![good]).await;
    harness.deliver(vec![worse]).await;

    assert_eq!(harness.session.best_fix().await, Some(good));
    assert_eq!(harness.session.last_fix().await, Some(worse));
    assert_eq!(harness.session.history().await.len(), 2);
}

#[tokio::test]
async fn test_invalid_fix_never_becomes_best() {
    let harness = Harness::with_config(manual_profile_config());
    let invalid = fix_north(0.0, 0, -1.0);
    harness.deliver(vec![invalid]).await;

    assert_eq!(harness.session.best_fix().await, None);
    assert_eq!(harness.session.last_fix().await, Some(invalid));
}

#[tokio::test]
async fn test_empty_batch_changes_nothing() {
    let harness = Harness::new();
    harness.deliver(Vec::new()).await;
    assert!(harness.session.history().await.is_empty());
    assert_eq!(harness.session.last_fix().await, None);
}

#[tokio::test]
async fn test_reset_history_clears_fixes() {
    let harness = Harness::with_config(manual_profile_config());
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    harness.session.reset_history().await;

    assert!(harness.session.history().await.is_empty());
    assert_eq!(harness.session.best_fix().await, None);
    assert_eq!(harness.session.last_fix().await, None);
}

#[tokio::test]
async fn test_delegate_routes_to_session() {
    let harness = Harness::with_config(manual_profile_config());
    let fix = fix_north(0.0, 0, 5.0);
    harness.clock.set(fix.timestamp());

    let delegate: &dyn LocationSourceDelegate = &harness.session;
    delegate.on_fix_batch(vec![fix]).await;
    assert_eq!(harness.session.last_fix().await, Some(fix));
}

// ============================================================================
// Single fix requests
// ============================================================================

#[tokio::test]
async fn test_pending_request_resolves_exactly_once() {
    let harness = Harness::with_config(manual_profile_config());
    let (completion, outcomes) = recording_completion();

    harness.session.request_single_fix(Some(completion)).await;
    assert_eq!(harness.source.request_one_count(), 1);
    assert!(outcomes.lock().unwrap().is_empty());

    let fix = fix_north(0.0, 0, 5.0);
    harness.deliver(vec![fix]).await;
    harness
        .session
        .handle_source_failure(TrackerError::source_failure("signal lost"))
        .await;

    let outcomes = outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0], Ok(fix));
}

#[tokio::test]
async fn test_request_fails_immediately_without_permission() {
    let harness = Harness::with_source(
        MockSource::new(AuthorizationStatus::Denied),
        TrackerConfig::default(),
    );
    let (completion, outcomes) = recording_completion();

    harness.session.request_single_fix(Some(completion)).await;

    assert_eq!(
        outcomes.lock().unwrap().as_slice(),
        &[Err(TrackerError::PermissionDenied)]
    );
    assert_eq!(harness.source.request_one_count(), 0);
}

#[tokio::test]
async fn test_source_failure_resolves_pending_request() {
    let harness = Harness::new();
    harness.session.set_enabled(true).await.unwrap();
    let (completion, outcomes) = recording_completion();
    harness.session.request_single_fix(Some(completion)).await;

    let error = TrackerError::source_failure("location unknown");
    harness.session.handle_source_failure(error.clone()).await;

    assert_eq!(outcomes.lock().unwrap().as_slice(), &[Err(error)]);
    assert_eq!(harness.source.count(&SourceCall::Stop), 0);
    assert!(harness.session.is_enabled().await);
}

#[tokio::test]
async fn test_second_request_replaces_first() {
    let harness = Harness::with_config(manual_profile_config());
    let (first, first_outcomes) = recording_completion();
    let (second, second_outcomes) = recording_completion();

    harness.session.request_single_fix(Some(first)).await;
    harness.session.request_single_fix(Some(second)).await;
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;

    assert!(first_outcomes.lock().unwrap().is_empty());
    assert_eq!(second_outcomes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_request_one_error_resolves_completion() {
    let source = MockSource::authorized();
    source.fail_request_one_with(TrackerError::source_failure("busy"));
    let harness = Harness::with_source(source, TrackerConfig::default());
    let (completion, outcomes) = recording_completion();

    harness.session.request_single_fix(Some(completion)).await;

    assert_eq!(
        outcomes.lock().unwrap().as_slice(),
        &[Err(TrackerError::source_failure("busy"))]
    );
}

#[tokio::test]
async fn test_next_fix_waits_for_batch() {
    let harness = Harness::with_config(manual_profile_config());
    let waiter = {
        let session = harness.session.clone();
        tokio::spawn(async move { session.next_fix().await })
    };

    while harness.source.request_one_count() == 0 {
        tokio::task::yield_now().await;
    }

    let fix = fix_north(0.0, 0, 5.0);
    harness.deliver(vec![fix]).await;
    assert_eq!(waiter.await.unwrap(), Ok(fix));
}

// ============================================================================
// Failsafe timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_failsafe_requests_fix_after_silence() {
    let harness = Harness::with_config(manual_profile_config());
    let mut events = harness.session.subscribe();

    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(harness.source.request_one_count(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(harness.source.request_one_count(), 1);

    let mut fired = false;
    while let Ok(event) = events.try_recv() {
        fired |= event == TrackerEvent::FailsafeFired;
    }
    assert!(fired);

    // One-shot: no further requests without a new batch
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(harness.source.request_one_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_batch_rearms_failsafe() {
    let harness = Harness::with_config(manual_profile_config());

    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    tokio::time::sleep(Duration::from_secs(6)).await;
    harness.deliver(vec![fix_north(1.0, 6, 5.0)]).await;
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(harness.source.request_one_count(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(harness.source.request_one_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disable_cancels_failsafe() {
    let harness = Harness::with_config(manual_profile_config());
    harness.session.set_enabled(true).await.unwrap();
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    harness.session.set_enabled(false).await.unwrap();

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(harness.source.request_one_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failsafe_keeps_pending_request() {
    let harness = Harness::with_config(manual_profile_config());
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;

    let (completion, outcomes) = recording_completion();
    harness.session.request_single_fix(Some(completion)).await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(harness.source.request_one_count(), 2);
    assert!(outcomes.lock().unwrap().is_empty());

    let fix = fix_north(3.0, 11, 5.0);
    harness.deliver(vec![fix]).await;
    assert_eq!(outcomes.lock().unwrap().as_slice(), &[Ok(fix)]);
}

#[tokio::test(start_paused = true)]
async fn test_custom_failsafe_interval() {
    let harness = Harness::with_config(TrackerConfig {
        failsafe_interval: Duration::from_secs(3),
        automatic_profile_change: false,
        ..TrackerConfig::default()
    });
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(harness.source.request_one_count(), 1);
}

// ============================================================================
// Automatic classification
// ============================================================================

#[tokio::test]
async fn test_fast_motion_selects_speeding() {
    let harness = Harness::new();
    for second in 0..3 {
        harness
            .deliver(vec![fix_north(30.0 * f64::from(second), i64::from(second), 5.0)])
            .await;
    }

    let profile = harness.session.active_profile().await;
    assert_eq!(profile, TrackingProfile::preset(ProfilePreset::Speeding, false));
    let configuration = harness.source.last_configuration().unwrap();
    assert_eq!(configuration.activity, ActivityTag::AutomotiveNavigation);
    assert_eq!(configuration.desired_accuracy, DesiredAccuracy::BestForNavigation);
    assert_eq!(configuration.distance_filter_m, Some(50.0));
}

#[tokio::test]
async fn test_walking_pace_selects_walk() {
    let harness = Harness::new();
    for second in 0..5 {
        harness
            .deliver(vec![fix_north(1.2 * f64::from(second), i64::from(second), 5.0)])
            .await;
    }
    assert_eq!(
        harness.session.active_profile().await.as_preset(),
        Some(ProfilePreset::Walk)
    );
}

#[tokio::test]
async fn test_single_fix_does_not_classify() {
    let harness = Harness::new();
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    assert_eq!(harness.session.active_profile().await, TrackingProfile::default());
    assert!(harness.source.configurations().is_empty());
}

#[tokio::test]
async fn test_classification_can_be_disabled() {
    let harness = Harness::new();
    harness.session.set_automatic_profile_change(false).await;
    for second in 0..3 {
        harness
            .deliver(vec![fix_north(30.0 * f64::from(second), i64::from(second), 5.0)])
            .await;
    }
    assert_eq!(harness.session.active_profile().await, TrackingProfile::default());
    assert!(!harness.session.automatic_profile_change().await);
}

#[tokio::test]
async fn test_classification_window_follows_config() {
    let harness = Harness::with_config(TrackerConfig {
        classification_window_secs: 3.0,
        ..TrackerConfig::default()
    });
    // Fast start, then a long stop; only the stop is inside the 3 s window
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    harness.deliver(vec![fix_north(30.0, 1, 5.0)]).await;
    for second in 10..13 {
        harness.deliver(vec![fix_north(30.0, second, 5.0)]).await;
    }
    assert_eq!(
        harness.session.active_profile().await.as_preset(),
        Some(ProfilePreset::Idle)
    );
    let metadata = harness.session.metadata(MetadataWindow::seconds(3.0)).await;
    assert_eq!(metadata.avg_window_speed_from_location_updates, Some(0.0));
}

// ============================================================================
// Profiles and power saving
// ============================================================================

#[tokio::test]
async fn test_set_active_profile_uses_current_saving_mode() {
    let harness = Harness::with_config(TrackerConfig {
        power_save: PowerSaveOption::On,
        ..TrackerConfig::default()
    });
    assert!(harness.session.battery_saving().await);

    harness
        .session
        .set_active_profile(TrackingProfile::preset(ProfilePreset::Jog, false))
        .await
        .unwrap();

    let profile = harness.session.active_profile().await;
    assert_eq!(profile, TrackingProfile::preset(ProfilePreset::Jog, true));
    assert_eq!(
        harness.source.last_configuration(),
        Some(profile.source_configuration())
    );
}

#[tokio::test]
async fn test_low_battery_reapplies_named_profile() {
    let harness = Harness::new();
    harness
        .session
        .handle_battery_changed(BatteryStatus::new(0.25, ChargeState::Unplugged))
        .await
        .unwrap();

    assert!(harness.session.battery_saving().await);
    assert_eq!(
        harness.session.active_profile().await,
        TrackingProfile::preset(ProfilePreset::Idle, true)
    );
    let configuration = harness.source.last_configuration().unwrap();
    assert!(!configuration.allows_background_updates);
    assert_eq!(configuration.distance_filter_m, Some(1.5));

    // Full charge switches saving off regardless of level
    harness
        .session
        .handle_battery_changed(BatteryStatus::new(0.25, ChargeState::Full))
        .await
        .unwrap();
    assert!(!harness.session.battery_saving().await);
    assert_eq!(harness.source.configurations().len(), 2);
}

#[tokio::test]
async fn test_battery_saving_retries_after_rejected_configuration() {
    let source = MockSource::authorized();
    source.fail_next_configure_with(TrackerError::source_failure("busy"));
    let harness = Harness::with_source(
        source,
        TrackerConfig {
            automatic_profile_change: false,
            initial_profile: ProfilePreset::Run,
            ..TrackerConfig::default()
        },
    );
    let mut events = harness.session.subscribe();

    let error = harness
        .session
        .handle_battery_changed(BatteryStatus::new(0.1, ChargeState::Unplugged))
        .await
        .unwrap_err();
    assert_eq!(error, TrackerError::source_failure("busy"));
    assert!(!harness.session.battery_saving().await);
    assert_eq!(
        harness.session.active_profile().await,
        TrackingProfile::preset(ProfilePreset::Run, false)
    );
    assert!(events.try_recv().is_err());

    harness
        .session
        .handle_battery_changed(BatteryStatus::new(0.05, ChargeState::Unplugged))
        .await
        .unwrap();
    let profile = harness.session.active_profile().await;
    assert!(harness.session.battery_saving().await);
    assert_eq!(profile, TrackingProfile::preset(ProfilePreset::Run, true));
    assert!(!profile.allows_background_updates());
    assert_eq!(harness.source.configurations().len(), 2);
    assert!(!harness.source.last_configuration().unwrap().allows_background_updates);
    assert!(matches!(
        events.try_recv().unwrap(),
        TrackerEvent::ProfileChanged { .. }
    ));
    assert_eq!(
        events.try_recv().unwrap(),
        TrackerEvent::BatterySavingChanged { enabled: true }
    );
}

#[tokio::test]
async fn test_unchanged_saving_flag_does_not_reconfigure() {
    let harness = Harness::new();
    harness
        .session
        .handle_battery_changed(BatteryStatus::new(0.9, ChargeState::Charging))
        .await
        .unwrap();
    harness
        .session
        .set_power_save_option(PowerSaveOption::Off)
        .await
        .unwrap();
    assert!(harness.source.configurations().is_empty());
    assert_eq!(harness.session.power_save_option().await, PowerSaveOption::Off);
}

#[tokio::test]
async fn test_custom_profile_survives_saving_change() {
    let harness = Harness::with_config(manual_profile_config());
    let custom = TrackingProfile::Custom(ProfileParameters {
        name: "survey".to_owned(),
        activity: ActivityTag::Other,
        allows_background_updates: true,
        desired_accuracy: DesiredAccuracy::Best,
        distance_filter_m: Some(0.5),
        thresholds: FilterThresholds {
            invalid_timestamp_age_secs: 30.0,
            significantly_newer_interval_secs: 3.0,
            significant_distance_change_m: 0.5,
            significant_accuracy_change_m: 5.0,
        },
    });
    harness.session.set_active_profile(custom.clone()).await.unwrap();
    harness
        .session
        .set_power_save_option(PowerSaveOption::On)
        .await
        .unwrap();

    assert!(harness.session.battery_saving().await);
    assert_eq!(harness.session.active_profile().await, custom);
    assert_eq!(harness.source.configurations().len(), 1);
}

// ============================================================================
// Recording, lifecycle, authorization, events
// ============================================================================

#[tokio::test]
async fn test_recordings_follow_toggles() {
    let harness = Harness::with_config(manual_profile_config());
    harness.session.set_debug_recording(true).await;
    harness.session.set_route_recording(true).await;

    let a = fix_north(0.0, 0, 50.0);
    let b = fix_north(1.0, 40, 5.0);
    harness.deliver(vec![a, b]).await;
    harness.session.set_debug_recording(false).await;
    harness.deliver(vec![fix_north(2.0, 80, 5.0)]).await;

    assert_eq!(harness.session.recorded_batches().await, vec![vec![a, b]]);
    assert_eq!(harness.session.recorded_route().await.len(), 2);

    harness.session.clear_recorded_route().await;
    harness.session.clear_recorded_batches().await;
    assert!(harness.session.recorded_route().await.is_empty());
    assert!(harness.session.recorded_batches().await.is_empty());
    assert!(harness.session.is_route_recording().await);
}

#[tokio::test]
async fn test_background_respects_profile() {
    let harness = Harness::new();
    harness.session.set_enabled(true).await.unwrap();

    harness.session.handle_app_lifecycle(AppLifecycle::Background).await;
    assert!(harness.session.is_enabled().await);

    harness
        .session
        .set_power_save_option(PowerSaveOption::On)
        .await
        .unwrap();
    harness.session.handle_app_lifecycle(AppLifecycle::Background).await;
    assert!(!harness.session.is_enabled().await);

    harness.session.handle_app_lifecycle(AppLifecycle::Foreground).await;
    assert!(harness.session.is_enabled().await);
}

#[tokio::test]
async fn test_foreground_without_permission_is_logged_only() {
    let harness = Harness::with_source(
        MockSource::new(AuthorizationStatus::NotDetermined),
        TrackerConfig::default(),
    );
    harness.session.handle_app_lifecycle(AppLifecycle::Foreground).await;
    assert!(!harness.session.is_enabled().await);
}

#[tokio::test]
async fn test_authorization_description_and_request() {
    let source = MockSource::new(AuthorizationStatus::NotDetermined);
    let harness = Harness::with_source(source, TrackerConfig::default());
    assert_eq!(harness.session.authorization_description(), "Not prompted");

    harness
        .session
        .request_authorization(AuthorizationLevel::WhenInUse)
        .await
        .unwrap();
    assert_eq!(
        harness.source.calls(),
        vec![SourceCall::RequestAuthorization(AuthorizationLevel::WhenInUse)]
    );

    harness
        .source
        .set_authorization(AuthorizationStatus::AuthorizedWhenInUse);
    assert_eq!(
        harness.session.authorization_description(),
        "Location services are enabled."
    );
    harness.source.set_authorization(AuthorizationStatus::Denied);
    assert_eq!(
        harness.session.authorization_description(),
        "Location services are disabled for this application."
    );
    harness.source.set_services_enabled(false);
    assert_eq!(
        harness.session.authorization_description(),
        "Location services are disabled for all apps."
    );
}

#[tokio::test]
async fn test_events_are_published() {
    let harness = Harness::new();
    let mut events = harness.session.subscribe();

    let fix = fix_north(0.0, 0, 5.0);
    harness.deliver(vec![fix]).await;
    harness
        .session
        .handle_authorization_changed(AuthorizationStatus::Denied)
        .await;

    assert_eq!(
        events.try_recv().unwrap(),
        TrackerEvent::FixAccepted { fix, is_best: true }
    );
    assert_eq!(
        events.try_recv().unwrap(),
        TrackerEvent::AuthorizationChanged {
            status: AuthorizationStatus::Denied
        }
    );
}

#[tokio::test]
async fn test_metadata_uses_session_clock() {
    let harness = Harness::with_config(manual_profile_config());
    harness.deliver(vec![fix_north(0.0, 0, 5.0)]).await;
    harness.deliver(vec![fix_north(100.0, 50, 5.0)]).await;

    harness.clock.set(at(55));
    let metadata = harness.session.metadata(MetadataWindow::seconds(10.0)).await;
    let speed = metadata.avg_speed_from_location_updates.unwrap();
    assert!((speed - 2.0).abs() < 1e-9);
    // Only the newest fix is inside the window
    assert_eq!(metadata.avg_window_speed_from_location_updates, None);
}
