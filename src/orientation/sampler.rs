// SPDX-License-Identifier: GPL-3.0-only

//! Background sampling loop for motion sources
//!
//! The sampler polls a [`MotionSource`] at a fixed cadence on its own thread
//! and hands each sample to a callback exactly once. Stopping joins the
//! thread, so once [`MotionSampler::stop`] returns no further sample reaches
//! the callback.

use crate::backends::motion::MotionSource;
use crate::errors::MotionError;
use crate::orientation::types::GravityVector;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Controller for a sampling loop running in a separate thread
///
/// # Example
///
/// ```ignore
/// let mut sampler = MotionSampler::start("orientation", source, interval, |gravity| {
///     store.update(classify(gravity));
/// })?;
///
/// // Later
/// sampler.stop();
/// ```
pub struct MotionSampler {
    /// Thread handle for joining
    thread_handle: Option<JoinHandle<()>>,
    /// Signal to stop the loop
    stop_signal: Arc<AtomicBool>,
    /// Name for logging
    name: String,
    interval: Duration,
}

impl MotionSampler {
    /// Start polling `source` every `interval`
    ///
    /// # Returns
    /// * `Ok(MotionSampler)` - Sampling thread running
    /// * `Err(MotionError::HardwareUnavailable)` - The source has no sensor
    pub fn start<F>(
        name: &str,
        source: Arc<dyn MotionSource>,
        interval: Duration,
        mut on_sample: F,
    ) -> Result<Self, MotionError>
    where
        F: FnMut(GravityVector) + Send + 'static,
    {
        if !source.is_available() {
            warn!(name = %name, source = source.name(), "Motion hardware unavailable, not sampling");
            return Err(MotionError::HardwareUnavailable);
        }

        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop_signal_clone = Arc::clone(&stop_signal);
        let name_clone = name.to_string();

        info!(
            name = %name,
            source = source.name(),
            interval_ms = interval.as_millis() as u64,
            "Starting motion sampler"
        );

        let thread_handle = thread::Builder::new()
            .name(format!("{}-sampler", name))
            .spawn(move || {
                debug!(name = %name_clone, "Sampler thread started");
                let mut read_failures = 0u64;

                loop {
                    if stop_signal_clone.load(Ordering::SeqCst) {
                        debug!(name = %name_clone, "Stop signal received");
                        break;
                    }

                    match source.read_gravity() {
                        Ok(Some(sample)) => {
                            read_failures = 0;
                            on_sample(sample);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            read_failures += 1;
                            if read_failures == 1 {
                                warn!(name = %name_clone, error = %e, "Motion read failed");
                            } else {
                                debug!(name = %name_clone, error = %e, count = read_failures, "Motion read failed again");
                            }
                        }
                    }

                    wait_for_next_tick(&stop_signal_clone, interval);
                }

                info!(name = %name_clone, "Sampler thread exiting");
            })
            .map_err(|e| MotionError::ReadFailed(format!("failed to spawn sampler thread: {}", e)))?;

        Ok(Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            name: name.to_string(),
            interval,
        })
    }

    /// Check if the loop is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the loop and wait for the thread to finish
    ///
    /// Calling this on a stopped sampler does nothing.
    pub fn stop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };

        self.stop_signal.store(true, Ordering::SeqCst);
        handle.thread().unpark();

        debug!(name = %self.name, "Waiting for sampler thread to finish");
        if let Err(e) = handle.join() {
            warn!(name = %self.name, "Sampler thread panicked: {:?}", e);
        } else {
            info!(name = %self.name, "Motion sampler stopped");
        }
    }
}

impl Drop for MotionSampler {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!(name = %self.name, "MotionSampler dropped, stopping loop");
            self.stop();
        }
    }
}

/// Park until the next tick, waking early if a stop is requested
fn wait_for_next_tick(stop_signal: &AtomicBool, interval: Duration) {
    let deadline = Instant::now() + interval;
    loop {
        if stop_signal.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}
