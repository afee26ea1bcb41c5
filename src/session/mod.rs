// ABOUTME: Tracking session controller orchestrating filter, profile and aggregator
// ABOUTME: Serializes fix batches, failures, timer expiries and battery changes behind one lock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

//! # Tracking Session
//!
//! A [`TrackingSession`] owns the accepted fix history, the best and last
//! fixes, the active profile and at most one pending single-fix request. All
//! of that state sits behind a single async mutex, so fix batches, failsafe
//! expiries and battery notifications never interleave.
//!
//! Completion callbacks run after the lock is released.

mod events;
mod failsafe;

pub use events::{SessionEvents, TrackerEvent};

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tokio::sync::{oneshot, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pacetrack_core::errors::{TrackerError, TrackerResult};
use pacetrack_core::models::Fix;

use crate::aggregator::{MetadataWindow, SessionHistory, WindowMetadata};
use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::filter::{assess, select_best};
use crate::logging::TrackerLogger;
use crate::profile::{preset_for_speed, BatteryStatus, PowerSaveOption, TrackingProfile};
use crate::source::{
    AppLifecycle, AuthorizationLevel, AuthorizationStatus, BatteryMonitor, LocationSource,
    LocationSourceDelegate, NoBattery,
};

use failsafe::FailsafeTimer;

/// Callback resolved exactly once with the outcome of a single-fix request
pub type SingleFixCompletion = Box<dyn FnOnce(TrackerResult<Fix>) + Send + 'static>;

struct SessionState {
    profile: TrackingProfile,
    power_save: PowerSaveOption,
    battery: Option<BatteryStatus>,
    battery_saving: bool,
    automatic_profile_change: bool,
    source_enabled: bool,
    history: SessionHistory,
    best_fix: Option<Fix>,
    last_fix: Option<Fix>,
    pending: Option<SingleFixCompletion>,
    failsafe: FailsafeTimer,
    debug_recording: bool,
    recorded_batches: Vec<Vec<Fix>>,
    route_recording: bool,
    recorded_route: Vec<Fix>,
}

struct SessionShared {
    id: Uuid,
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    battery_monitor: Arc<dyn BatteryMonitor>,
    config: TrackerConfig,
    events: SessionEvents,
    state: Mutex<SessionState>,
}

/// Builder for [`TrackingSession`]
pub struct TrackingSessionBuilder {
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    battery_monitor: Arc<dyn BatteryMonitor>,
    config: TrackerConfig,
}

impl TrackingSessionBuilder {
    /// Use `clock` for staleness checks and time windows
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Read the initial battery state from `monitor`
    #[must_use]
    pub fn battery_monitor(mut self, monitor: Arc<dyn BatteryMonitor>) -> Self {
        self.battery_monitor = monitor;
        self
    }

    /// Apply `config`
    #[must_use]
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the session
    ///
    /// The source is configured for the initial profile when it is first
    /// enabled.
    #[must_use]
    pub fn build(self) -> TrackingSession {
        let battery = self.battery_monitor.battery_status();
        let battery_saving = self.config.power_save.battery_saving(battery);
        let profile = TrackingProfile::preset(self.config.initial_profile, battery_saving);
        let id = Uuid::new_v4();

        info!(
            session.id = %id,
            profile = %profile,
            power_save = %self.config.power_save,
            auto_profile = self.config.automatic_profile_change,
            "Tracking session created"
        );

        let state = SessionState {
            profile,
            power_save: self.config.power_save,
            battery,
            battery_saving,
            automatic_profile_change: self.config.automatic_profile_change,
            source_enabled: false,
            history: SessionHistory::new(),
            best_fix: None,
            last_fix: None,
            pending: None,
            failsafe: FailsafeTimer::default(),
            debug_recording: false,
            recorded_batches: Vec::new(),
            route_recording: false,
            recorded_route: Vec::new(),
        };

        TrackingSession {
            shared: Arc::new(SessionShared {
                id,
                source: self.source,
                clock: self.clock,
                battery_monitor: self.battery_monitor,
                events: SessionEvents::new(self.config.event_buffer),
                config: self.config,
                state: Mutex::new(state),
            }),
        }
    }
}

/// Tracking session controller
///
/// Cloning yields another handle to the same session. The failsafe timer is
/// cancelled when the last handle is dropped.
#[derive(Clone)]
pub struct TrackingSession {
    shared: Arc<SessionShared>,
}

impl TrackingSession {
    /// Start building a session over `source`
    #[must_use]
    pub fn builder(source: Arc<dyn LocationSource>) -> TrackingSessionBuilder {
        TrackingSessionBuilder {
            source,
            clock: Arc::new(SystemClock),
            battery_monitor: Arc::new(NoBattery),
            config: TrackerConfig::default(),
        }
    }

    /// Session with default configuration
    #[must_use]
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self::builder(source).build()
    }

    /// Unique session identifier used in logs
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Configuration the session was built with
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.shared.config
    }

    /// Register an observer for session events
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<TrackerEvent> {
        self.shared.events.subscribe()
    }

    async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.shared.state.lock().await
    }

    // ------------------------------------------------------------------
    // Source lifecycle
    // ------------------------------------------------------------------

    /// Start or stop continuous updates
    ///
    /// Enabling an enabled session and disabling a disabled one do nothing.
    /// Disabling also cancels the failsafe timer.
    ///
    /// # Errors
    ///
    /// Enabling fails with `ServicesDisabled`, `PermissionDenied` or
    /// `PermissionNotDetermined`, or with whatever the source reports when
    /// it cannot be configured, started or stopped.
    pub async fn set_enabled(&self, enabled: bool) -> TrackerResult<()> {
        let mut state = self.lock().await;
        if enabled == state.source_enabled {
            return Ok(());
        }

        let source = &self.shared.source;
        if enabled {
            if let Err(error) = source.ensure_available() {
                warn!(session.id = %self.shared.id, error = %error, "Cannot enable location source");
                return Err(error);
            }
            source
                .configure(state.profile.source_configuration())
                .await?;
            source.start().await?;
        } else {
            source.stop().await?;
            state.failsafe.cancel();
        }

        state.source_enabled = enabled;
        info!(session.id = %self.shared.id, enabled, "Location source toggled");
        self.shared
            .events
            .publish(TrackerEvent::SourceEnabledChanged { enabled });
        Ok(())
    }

    /// Whether continuous updates are running
    pub async fn is_enabled(&self) -> bool {
        self.lock().await.source_enabled
    }

    // ------------------------------------------------------------------
    // Delegate entry points
    // ------------------------------------------------------------------

    /// Process a raw batch from the source
    ///
    /// Cancels the failsafe timer, selects the best fix of the batch, appends
    /// it to the history, updates the best and last fixes, re-classifies the
    /// profile, resolves a pending single-fix request and re-arms the failsafe
    /// timer. An empty batch only cancels the timer.
    pub async fn handle_fix_batch(&self, fixes: Vec<Fix>) {
        let now = self.shared.clock.now();
        let id = self.shared.id;

        let (completion, chosen) = {
            let mut state = self.lock().await;
            state.failsafe.cancel();

            if state.debug_recording {
                state.recorded_batches.push(fixes.clone());
            }

            let Some(chosen) = select_best(&fixes, &state.profile, now) else {
                debug!(session.id = %id, "Empty fix batch");
                return;
            };

            state.history.push(chosen);
            if state.route_recording {
                state.recorded_route.push(chosen);
            }

            let verdict = assess(
                &chosen,
                state.best_fix.as_ref(),
                &state.profile.thresholds(),
                now,
            );
            TrackerLogger::log_filter_verdict(id, verdict);
            let is_best = verdict.is_accepted() && chosen.has_valid_position();
            if is_best {
                state.best_fix = Some(chosen);
            }
            state.last_fix = Some(chosen);

            TrackerLogger::log_fix_selected(id, &chosen, fixes.len(), is_best);
            self.shared
                .events
                .publish(TrackerEvent::FixAccepted { fix: chosen, is_best });

            if state.automatic_profile_change {
                self.classify(&mut state, now).await;
            }

            let completion = state.pending.take();
            self.arm_failsafe(&mut state);
            (completion, chosen)
        };

        if let Some(completion) = completion {
            completion(Ok(chosen));
        }
    }

    /// Route a source failure to the pending single-fix request
    ///
    /// The source keeps running and the history is untouched.
    pub async fn handle_source_failure(&self, error: TrackerError) {
        let completion = self.lock().await.pending.take();
        TrackerLogger::log_source_failure(self.shared.id, &error, completion.is_some());
        self.shared.events.publish(TrackerEvent::SourceFailed {
            error: error.clone(),
        });
        if let Some(completion) = completion {
            completion(Err(error));
        }
    }

    /// Publish an authorization change to observers
    pub async fn handle_authorization_changed(&self, status: AuthorizationStatus) {
        let enabled = self.is_enabled().await;
        info!(
            session.id = %self.shared.id,
            authorization = %status,
            enabled,
            "Location authorization changed"
        );
        self.shared
            .events
            .publish(TrackerEvent::AuthorizationChanged { status });
    }

    // ------------------------------------------------------------------
    // Single fix requests
    // ------------------------------------------------------------------

    /// Ask the source for one fix and resolve `completion` when it arrives
    ///
    /// Authorization problems resolve `completion` immediately. Otherwise it
    /// replaces any request still pending and is resolved by the next
    /// non-empty batch or source failure.
    pub async fn request_single_fix(&self, completion: Option<SingleFixCompletion>) {
        let failed = {
            let mut state = self.lock().await;
            match self.shared.source.ensure_available() {
                Err(error) => Some((completion, error)),
                Ok(()) => {
                    if state.pending.is_some() {
                        debug!(session.id = %self.shared.id, "Replacing pending single fix request");
                    }
                    state.pending = completion;
                    match self.shared.source.request_one().await {
                        Ok(()) => None,
                        Err(error) => Some((state.pending.take(), error)),
                    }
                }
            }
        };

        if let Some((completion, error)) = failed {
            warn!(session.id = %self.shared.id, error = %error, "Single fix request failed");
            if let Some(completion) = completion {
                completion(Err(error));
            }
        }
    }

    /// Request one fix and wait for it
    ///
    /// # Errors
    ///
    /// Returns the authorization or source error that resolved the request,
    /// or `SourceFailure` when a later request replaced this one.
    pub async fn next_fix(&self) -> TrackerResult<Fix> {
        let (sender, receiver) = oneshot::channel();
        self.request_single_fix(Some(Box::new(move |result| {
            // The caller may have stopped waiting
            let _ = sender.send(result);
        })))
        .await;
        receiver
            .await
            .map_err(|_| TrackerError::source_failure("single fix request was replaced"))?
    }

    // ------------------------------------------------------------------
    // Profiles and power
    // ------------------------------------------------------------------

    /// Replace the active profile and push its settings to the source
    ///
    /// Named presets are re-derived for the current battery saving flag;
    /// custom profiles are stored as given.
    ///
    /// # Errors
    ///
    /// Returns the source error if the configuration was refused; the
    /// previous profile stays active in that case.
    pub async fn set_active_profile(&self, profile: TrackingProfile) -> TrackerResult<()> {
        let mut state = self.lock().await;
        let profile = profile.with_battery_saving(state.battery_saving);
        self.activate(&mut state, profile, None).await
    }

    /// Currently active profile
    pub async fn active_profile(&self) -> TrackingProfile {
        self.lock().await.profile.clone()
    }

    /// Change the power save preference
    ///
    /// # Errors
    ///
    /// Returns the source error if re-applying the profile failed.
    pub async fn set_power_save_option(&self, option: PowerSaveOption) -> TrackerResult<()> {
        let mut state = self.lock().await;
        state.power_save = option;
        self.refresh_battery_saving(&mut state).await
    }

    /// Current power save preference
    pub async fn power_save_option(&self) -> PowerSaveOption {
        self.lock().await.power_save
    }

    /// Record a battery reading from the battery observer
    ///
    /// # Errors
    ///
    /// Returns the source error if re-applying the profile failed.
    pub async fn handle_battery_changed(&self, status: BatteryStatus) -> TrackerResult<()> {
        let mut state = self.lock().await;
        state.battery = Some(status);
        self.refresh_battery_saving(&mut state).await
    }

    /// Re-read the battery monitor the session was built with
    ///
    /// # Errors
    ///
    /// Returns the source error if re-applying the profile failed.
    pub async fn poll_battery(&self) -> TrackerResult<()> {
        let status = self.shared.battery_monitor.battery_status();
        let mut state = self.lock().await;
        state.battery = status;
        self.refresh_battery_saving(&mut state).await
    }

    /// Derived battery saving flag
    pub async fn battery_saving(&self) -> bool {
        self.lock().await.battery_saving
    }

    /// Toggle automatic profile changes driven by observed speed
    pub async fn set_automatic_profile_change(&self, enabled: bool) {
        self.lock().await.automatic_profile_change = enabled;
    }

    /// Whether automatic profile changes are enabled
    pub async fn automatic_profile_change(&self) -> bool {
        self.lock().await.automatic_profile_change
    }

    // ------------------------------------------------------------------
    // History and statistics
    // ------------------------------------------------------------------

    /// Best fix seen during the session
    pub async fn best_fix(&self) -> Option<Fix> {
        self.lock().await.best_fix
    }

    /// Fix chosen from the most recent batch
    pub async fn last_fix(&self) -> Option<Fix> {
        self.lock().await.last_fix
    }

    /// Snapshot of the accepted fixes in acceptance order
    pub async fn history(&self) -> SessionHistory {
        self.lock().await.history.clone()
    }

    /// Metadata over the history as of the session clock
    pub async fn metadata(&self, window: MetadataWindow) -> WindowMetadata {
        let snapshot = self.history().await;
        snapshot.metadata(window, self.shared.clock.now())
    }

    /// Clear the history together with the best and last fixes
    pub async fn reset_history(&self) {
        let mut state = self.lock().await;
        state.history.clear();
        state.best_fix = None;
        state.last_fix = None;
        info!(session.id = %self.shared.id, "Session history reset");
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Keep every raw batch
    pub async fn set_debug_recording(&self, enabled: bool) {
        self.lock().await.debug_recording = enabled;
    }

    /// Whether raw batches are kept
    pub async fn is_debug_recording(&self) -> bool {
        self.lock().await.debug_recording
    }

    /// Raw batches kept so far
    pub async fn recorded_batches(&self) -> Vec<Vec<Fix>> {
        self.lock().await.recorded_batches.clone()
    }

    /// Drop the kept raw batches
    pub async fn clear_recorded_batches(&self) {
        self.lock().await.recorded_batches.clear();
    }

    /// Keep every accepted fix for a route track
    pub async fn set_route_recording(&self, enabled: bool) {
        self.lock().await.route_recording = enabled;
    }

    /// Whether accepted fixes are kept for a route track
    pub async fn is_route_recording(&self) -> bool {
        self.lock().await.route_recording
    }

    /// Accepted fixes kept for a route track
    pub async fn recorded_route(&self) -> Vec<Fix> {
        self.lock().await.recorded_route.clone()
    }

    /// Drop the kept route fixes
    pub async fn clear_recorded_route(&self) {
        self.lock().await.recorded_route.clear();
    }

    // ------------------------------------------------------------------
    // Authorization and application lifecycle
    // ------------------------------------------------------------------

    /// Ask the source to prompt for access
    ///
    /// # Errors
    ///
    /// Returns the source error if the prompt could not be shown.
    pub async fn request_authorization(&self, level: AuthorizationLevel) -> TrackerResult<()> {
        self.shared.source.request_authorization(level).await
    }

    /// Short description of the current access state
    #[must_use]
    pub fn authorization_description(&self) -> &'static str {
        if !self.shared.source.services_enabled() {
            return "Location services are disabled for all apps.";
        }
        match self.shared.source.authorization().has_permission() {
            Some(true) => "Location services are enabled.",
            Some(false) => "Location services are disabled for this application.",
            None => "Not prompted",
        }
    }

    /// React to the host application changing visibility
    ///
    /// Moving to the background stops updates unless the active profile
    /// allows background updates; returning to the foreground restarts them.
    /// Failures are logged.
    pub async fn handle_app_lifecycle(&self, event: AppLifecycle) {
        let result = match event {
            AppLifecycle::Background => {
                if self.lock().await.profile.allows_background_updates() {
                    return;
                }
                self.set_enabled(false).await
            }
            AppLifecycle::Foreground => self.set_enabled(true).await,
        };
        if let Err(error) = result {
            warn!(session.id = %self.shared.id, ?event, error = %error, "Lifecycle transition failed");
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn activate(
        &self,
        state: &mut SessionState,
        profile: TrackingProfile,
        window_speed: Option<f64>,
    ) -> TrackerResult<()> {
        self.shared
            .source
            .configure(profile.source_configuration())
            .await?;
        TrackerLogger::log_profile_change(self.shared.id, &state.profile, &profile, window_speed);
        state.profile = profile.clone();
        self.shared
            .events
            .publish(TrackerEvent::ProfileChanged { profile });
        Ok(())
    }

    async fn classify(&self, state: &mut SessionState, now: chrono::DateTime<chrono::Utc>) {
        let window = MetadataWindow::seconds(self.shared.config.classification_window_secs);
        let metadata = state.history.metadata(window, now);
        let Some(speed) = metadata.avg_window_speed_from_location_updates else {
            return;
        };

        let next = TrackingProfile::preset(preset_for_speed(speed), state.battery_saving);
        if next == state.profile {
            return;
        }
        if let Err(error) = self.activate(state, next, Some(speed)).await {
            warn!(session.id = %self.shared.id, error = %error, "Automatic profile change failed");
        }
    }

    async fn refresh_battery_saving(&self, state: &mut SessionState) -> TrackerResult<()> {
        let saving = state.power_save.battery_saving(state.battery);
        if saving == state.battery_saving {
            return Ok(());
        }
        // Flag stays uncommitted until the source accepts the re-derived preset
        if !state.profile.is_custom() {
            let profile = state.profile.clone().with_battery_saving(saving);
            self.activate(state, profile, None).await?;
        }

        state.battery_saving = saving;
        info!(session.id = %self.shared.id, battery_saving = saving, "Battery saving changed");
        self.shared
            .events
            .publish(TrackerEvent::BatterySavingChanged { enabled: saving });
        Ok(())
    }

    fn arm_failsafe(&self, state: &mut SessionState) {
        let weak: Weak<SessionShared> = Arc::downgrade(&self.shared);
        state
            .failsafe
            .arm(self.shared.config.failsafe_interval, move |generation| async move {
                if let Some(shared) = weak.upgrade() {
                    Self { shared }.fire_failsafe(generation).await;
                }
            });
    }

    async fn fire_failsafe(&self, generation: u64) {
        let mut state = self.lock().await;
        if !state.failsafe.claim(generation) {
            return;
        }
        info!(session.id = %self.shared.id, "No fixes since the last batch, requesting one");
        self.shared.events.publish(TrackerEvent::FailsafeFired);

        let source = &self.shared.source;
        let result = match source.ensure_available() {
            Ok(()) => source.request_one().await,
            Err(error) => Err(error),
        };
        drop(state);
        if let Err(error) = result {
            warn!(session.id = %self.shared.id, error = %error, "Failsafe fix request failed");
        }
    }
}

#[async_trait]
impl LocationSourceDelegate for TrackingSession {
    async fn on_fix_batch(&self, fixes: Vec<Fix>) {
        self.handle_fix_batch(fixes).await;
    }

    async fn on_failure(&self, error: TrackerError) {
        self.handle_source_failure(error).await;
    }

    async fn on_authorization_changed(&self, status: AuthorizationStatus) {
        self.handle_authorization_changed(status).await;
    }
}
