// ABOUTME: One-shot watchdog task that re-requests a fix after a period of silence
// ABOUTME: At most one timer is armed; re-arming or dropping aborts the previous one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pacetrack Contributors

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Holder of the single outstanding failsafe task
#[derive(Debug, Default)]
pub struct FailsafeTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl FailsafeTimer {
    /// Abort the armed timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "Failsafe timer cancelled");
        }
    }

    /// Replace the armed timer with one that runs `on_expiry(generation)` after `interval`
    ///
    /// The deadline is taken when arming, not when the task first runs.
    /// Returns the generation of the new timer.
    pub fn arm<F, Fut>(&mut self, interval: Duration, on_expiry: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let deadline = Instant::now() + interval;
        self.handle = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            on_expiry(generation).await;
        }));
        generation
    }

    /// Called from the expiry path: forget the handle if `generation` is still current
    ///
    /// Returns whether the firing timer is the current one. The handle is
    /// released without aborting so the running task is not cancelled.
    pub fn claim(&mut self, generation: u64) -> bool {
        if self.generation != generation || self.handle.is_none() {
            return false;
        }
        self.handle = None;
        true
    }

    /// Whether a timer is armed
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for FailsafeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
