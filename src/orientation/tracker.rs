// SPDX-License-Identifier: GPL-3.0-only

//! Orientation tracking lifecycle
//!
//! Wires a motion source through the sampler and classifier into the
//! orientation store. A missing sensor is not an error for callers: the
//! tracker logs it, reports [`TrackingStatus::HardwareUnavailable`] and the
//! published orientation stays at its portrait default.

use super::classifier::classify;
use super::sampler::MotionSampler;
use super::state::{OrientationHandle, OrientationStore};
use super::types::{CameraPosition, OrientationSnapshot};
use crate::backends::motion::MotionSource;
use crate::config::Config;
use crate::constants::MIN_SAMPLE_INTERVAL;
use crate::errors::MotionError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Tracker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Not started, or stopped
    Idle,
    /// Sampling
    Running,
    /// Last start found no motion sensor
    HardwareUnavailable,
}

/// Device orientation tracker
pub struct OrientationTracker {
    source: Arc<dyn MotionSource>,
    store: Arc<OrientationStore>,
    interval: Duration,
    sampler: Option<MotionSampler>,
    status: TrackingStatus,
}

impl OrientationTracker {
    /// Create a tracker; sampling begins with [`OrientationTracker::start`]
    pub fn new(source: Arc<dyn MotionSource>, config: &Config) -> Self {
        Self::with_interval(source, config.sample_interval(), config.camera_position)
    }

    /// Create a tracker polling every `interval`
    ///
    /// Intervals below [`MIN_SAMPLE_INTERVAL`] are raised to it.
    pub fn with_interval(
        source: Arc<dyn MotionSource>,
        interval: Duration,
        camera_position: CameraPosition,
    ) -> Self {
        let interval = if interval < MIN_SAMPLE_INTERVAL {
            warn!(
                requested_us = interval.as_micros() as u64,
                min_ms = MIN_SAMPLE_INTERVAL.as_millis() as u64,
                "Sample interval too short, clamping"
            );
            MIN_SAMPLE_INTERVAL
        } else {
            interval
        };

        Self {
            source,
            store: Arc::new(OrientationStore::new(camera_position)),
            interval,
            sampler: None,
            status: TrackingStatus::Idle,
        }
    }

    /// Start tracking from a fresh portrait state
    ///
    /// Does nothing if already running. If the sensor is missing the failure
    /// is logged and reflected in [`OrientationTracker::status`].
    pub fn start(&mut self) {
        if self.sampler.is_some() {
            return;
        }

        self.store.reset();

        let store = Arc::clone(&self.store);
        match MotionSampler::start(
            "orientation",
            Arc::clone(&self.source),
            self.interval,
            move |gravity| {
                store.update(classify(gravity));
            },
        ) {
            Ok(sampler) => {
                info!(interval_ms = self.interval.as_millis() as u64, "Orientation tracking started");
                self.sampler = Some(sampler);
                self.status = TrackingStatus::Running;
            }
            Err(MotionError::HardwareUnavailable) => {
                warn!("Orientation tracking unavailable, keeping default portrait orientation");
                self.status = TrackingStatus::HardwareUnavailable;
            }
            Err(e) => {
                warn!(error = %e, "Orientation tracking failed to start");
                self.status = TrackingStatus::Idle;
            }
        }
    }

    /// Stop tracking
    ///
    /// Idempotent. After this returns no further sample updates the state.
    pub fn stop(&mut self) {
        if let Some(mut sampler) = self.sampler.take() {
            sampler.stop();
            info!("Orientation tracking stopped");
        }
        if self.status == TrackingStatus::Running {
            self.status = TrackingStatus::Idle;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn is_tracking(&self) -> bool {
        self.sampler.as_ref().is_some_and(|s| s.is_running())
    }

    /// Get a read-only handle to the published orientation
    pub fn handle(&self) -> OrientationHandle {
        self.store.handle()
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        self.store.snapshot()
    }
}

impl Drop for OrientationTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for OrientationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationTracker")
            .field("source", &self.source.name())
            .field("interval", &self.interval)
            .field("status", &self.status)
            .finish()
    }
}
