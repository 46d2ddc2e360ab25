// SPDX-License-Identifier: GPL-3.0-only

//! Motion sensor abstraction
//!
//! The tracker only needs a gravity vector on demand. Platform glue wraps the
//! native accelerometer API behind [`MotionSource`]; [`ScriptedMotionSource`]
//! replays recorded or synthetic samples for host-side testing.

mod scripted;

pub use scripted::ScriptedMotionSource;

use crate::errors::MotionError;
use crate::orientation::types::GravityVector;

/// Accelerometer-class input
///
/// Implementations are polled from the sampler's background thread.
pub trait MotionSource: Send + Sync {
    /// Check whether the sensor exists on this device
    fn is_available(&self) -> bool;

    /// Read the most recent normalized gravity vector
    ///
    /// # Returns
    /// * `Ok(Some(vector))` - A fresh sample
    /// * `Ok(None)` - No new sample since the last read
    /// * `Err(MotionError)` - Sensor failure
    fn read_gravity(&self) -> Result<Option<GravityVector>, MotionError>;

    /// Human-readable sensor name for logging
    fn name(&self) -> &str {
        "motion"
    }
}
