// SPDX-License-Identifier: GPL-3.0-only

//! Scripted motion source that replays a queue of gravity samples

use super::MotionSource;
use crate::errors::MotionError;
use crate::orientation::types::GravityVector;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Motion source fed from a queue
///
/// Each queued sample is returned by exactly one read. When the queue is
/// empty the source either repeats the last sample (`hold_last`) or reports
/// no new data.
#[derive(Debug)]
pub struct ScriptedMotionSource {
    samples: Mutex<VecDeque<GravityVector>>,
    last: Mutex<Option<GravityVector>>,
    available: AtomicBool,
    hold_last: bool,
    reads: AtomicUsize,
}

impl ScriptedMotionSource {
    /// Create an available source with the given samples
    pub fn new(samples: impl IntoIterator<Item = GravityVector>) -> Self {
        Self {
            samples: Mutex::new(samples.into_iter().collect()),
            last: Mutex::new(None),
            available: AtomicBool::new(true),
            hold_last: false,
            reads: AtomicUsize::new(0),
        }
    }

    /// Create a source for a device without motion hardware
    pub fn unavailable() -> Self {
        let source = Self::new([]);
        source.available.store(false, Ordering::SeqCst);
        source
    }

    /// Keep returning the last sample once the queue drains
    pub fn hold_last(mut self) -> Self {
        self.hold_last = true;
        self
    }

    /// Queue another sample
    pub fn push(&self, sample: GravityVector) {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(sample);
    }

    /// Number of queued samples not yet read
    pub fn pending(&self) -> usize {
        self.samples.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of reads that returned a sample
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl MotionSource for ScriptedMotionSource {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn read_gravity(&self) -> Result<Option<GravityVector>, MotionError> {
        if !self.is_available() {
            return Err(MotionError::HardwareUnavailable);
        }

        let next = self
            .samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let sample = match next {
            Some(sample) => {
                *last = Some(sample);
                Some(sample)
            }
            None if self.hold_last => *last,
            None => None,
        };

        if sample.is_some() {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
        Ok(sample)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_read_once() {
        let source = ScriptedMotionSource::new([
            GravityVector::new(0.0, -1.0, 0.0),
            GravityVector::new(1.0, 0.0, 0.0),
        ]);
        assert_eq!(source.read_gravity().unwrap(), Some(GravityVector::new(0.0, -1.0, 0.0)));
        assert_eq!(source.read_gravity().unwrap(), Some(GravityVector::new(1.0, 0.0, 0.0)));
        assert_eq!(source.read_gravity().unwrap(), None);
        assert_eq!(source.reads(), 2);
    }

    #[test]
    fn test_hold_last_repeats() {
        let source = ScriptedMotionSource::new([GravityVector::new(1.0, 0.0, 0.0)]).hold_last();
        source.read_gravity().unwrap();
        assert_eq!(source.read_gravity().unwrap(), Some(GravityVector::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unavailable_source() {
        let source = ScriptedMotionSource::unavailable();
        assert!(!source.is_available());
        assert_eq!(source.read_gravity(), Err(MotionError::HardwareUnavailable));
    }
}
