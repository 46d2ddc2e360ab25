// SPDX-License-Identifier: GPL-3.0-only

//! Orientation state machine and its published snapshot
//!
//! [`OrientationState`] applies the debounce rule to classifications.
//! [`OrientationStore`] is the single writer that publishes the resulting
//! snapshot through a `watch` channel, so readers always observe whole
//! snapshots and never need their own locking. [`OrientationHandle`] is the
//! read side handed to capture and presentation code.

use super::classifier::Classification;
use super::types::{
    CameraPosition, DiscreteOrientation, OrientationSnapshot, ValidOrientation, VideoOrientation,
};
use tokio::sync::watch;
use tracing::debug;

/// Which published fields a classification changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateChange {
    pub current_changed: bool,
    pub last_valid_changed: bool,
    pub angle_changed: bool,
}

impl StateChange {
    pub fn any(&self) -> bool {
        self.current_changed || self.last_valid_changed || self.angle_changed
    }
}

/// Debounced orientation state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationState {
    snapshot: OrientationSnapshot,
}

impl OrientationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        self.snapshot
    }

    /// Apply one classification
    ///
    /// `current` always follows the classification. `last_valid` moves only
    /// into a valid pose that differs from the one it holds.
    pub fn apply(&mut self, classification: Classification) -> StateChange {
        let snapshot = &mut self.snapshot;
        let mut change = StateChange::default();

        if snapshot.current != classification.orientation {
            snapshot.current = classification.orientation;
            change.current_changed = true;
        }

        if let Some(valid) = classification.orientation.as_valid()
            && valid != snapshot.last_valid
        {
            snapshot.last_valid = valid;
            change.last_valid_changed = true;
        }

        if snapshot.angle_radians != classification.angle_radians {
            snapshot.angle_radians = classification.angle_radians;
            change.angle_changed = true;
        }

        change
    }
}

/// Single writer for the published orientation snapshot
#[derive(Debug)]
pub struct OrientationStore {
    state: std::sync::Mutex<OrientationState>,
    sender: watch::Sender<OrientationSnapshot>,
    camera_position: CameraPosition,
}

impl OrientationStore {
    pub fn new(camera_position: CameraPosition) -> Self {
        let (sender, _) = watch::channel(OrientationSnapshot::default());
        Self {
            state: std::sync::Mutex::new(OrientationState::new()),
            sender,
            camera_position,
        }
    }

    /// Apply a classification and publish the result if anything changed
    ///
    /// The state lock is held across the publish, so publications happen in
    /// the same order as updates.
    pub fn update(&self, classification: Classification) -> StateChange {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let previous = state.snapshot();
        let change = state.apply(classification);

        if change.any() {
            let snapshot = state.snapshot();
            self.sender.send_replace(snapshot);

            if change.current_changed {
                debug!(
                    from = %previous.current,
                    to = %snapshot.current,
                    "Orientation changed"
                );
            }
            if change.last_valid_changed {
                debug!(
                    from = %previous.last_valid,
                    to = %snapshot.last_valid,
                    "Capture orientation changed"
                );
            }
        }

        change
    }

    /// Drop all state back to the portrait default
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = OrientationState::new();
        self.sender.send_replace(state.snapshot());
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        *self.sender.borrow()
    }

    /// Get a read-only handle for observers
    pub fn handle(&self) -> OrientationHandle {
        OrientationHandle {
            receiver: self.sender.subscribe(),
            camera_position: self.camera_position,
        }
    }
}

/// Read side of the orientation state
///
/// Cheap to clone. Dropping the handle (or any receiver obtained from
/// [`OrientationHandle::subscribe`]) unsubscribes it.
#[derive(Debug, Clone)]
pub struct OrientationHandle {
    receiver: watch::Receiver<OrientationSnapshot>,
    camera_position: CameraPosition,
}

impl OrientationHandle {
    /// A handle that never updates, fixed at the portrait default
    pub fn detached(camera_position: CameraPosition) -> Self {
        OrientationStore::new(camera_position).handle()
    }

    pub fn snapshot(&self) -> OrientationSnapshot {
        *self.receiver.borrow()
    }

    pub fn current_orientation(&self) -> DiscreteOrientation {
        self.snapshot().current
    }

    pub fn last_valid_orientation(&self) -> ValidOrientation {
        self.snapshot().last_valid
    }

    pub fn angle_radians(&self) -> f64 {
        self.snapshot().angle_radians
    }

    /// Orientation to stamp on a capture requested now
    pub fn capture_orientation(&self) -> ValidOrientation {
        self.snapshot().capture_orientation()
    }

    /// Capture orientation in the sensor frame of the configured camera
    pub fn video_orientation(&self) -> VideoOrientation {
        self.snapshot().video_orientation(self.camera_position)
    }

    pub fn camera_position(&self) -> CameraPosition {
        self.camera_position
    }

    /// Get a new receiver that is notified on every published change
    pub fn subscribe(&self) -> watch::Receiver<OrientationSnapshot> {
        let mut receiver = self.receiver.clone();
        receiver.mark_unchanged();
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::classifier::classify;
    use crate::orientation::types::GravityVector;

    fn classification(orientation: DiscreteOrientation) -> Classification {
        Classification {
            orientation,
            angle_radians: 0.0,
        }
    }

    #[test]
    fn test_starts_in_portrait() {
        let state = OrientationState::new();
        assert_eq!(state.snapshot().current, DiscreteOrientation::Portrait);
        assert_eq!(state.snapshot().last_valid, ValidOrientation::Portrait);
        assert_eq!(state.snapshot().angle_radians, 0.0);
    }

    #[test]
    fn test_invalid_poses_only_move_current() {
        let mut state = OrientationState::new();
        state.apply(classification(DiscreteOrientation::LandscapeLeft));

        for invalid in [
            DiscreteOrientation::FaceUp,
            DiscreteOrientation::FaceDown,
            DiscreteOrientation::Unknown,
        ] {
            let change = state.apply(classification(invalid));
            assert!(change.current_changed);
            assert!(!change.last_valid_changed);
            assert_eq!(state.snapshot().current, invalid);
            assert_eq!(state.snapshot().last_valid, ValidOrientation::LandscapeLeft);
        }
    }

    #[test]
    fn test_repeated_valid_pose_is_debounced() {
        let mut state = OrientationState::new();
        let first = state.apply(classification(DiscreteOrientation::LandscapeRight));
        assert!(first.last_valid_changed);

        let second = state.apply(classification(DiscreteOrientation::LandscapeRight));
        assert!(!second.any());
    }

    #[test]
    fn test_return_to_same_valid_pose_after_flat() {
        let mut state = OrientationState::new();
        state.apply(classification(DiscreteOrientation::FaceUp));
        let change = state.apply(classification(DiscreteOrientation::Portrait));
        assert!(change.current_changed);
        assert!(!change.last_valid_changed);
    }

    #[test]
    fn test_last_valid_is_always_capturable() {
        let mut state = OrientationState::new();
        let sequence = [
            DiscreteOrientation::Unknown,
            DiscreteOrientation::LandscapeLeft,
            DiscreteOrientation::FaceDown,
            DiscreteOrientation::PortraitUpsideDown,
            DiscreteOrientation::FaceUp,
            DiscreteOrientation::Unknown,
        ];
        for orientation in sequence {
            state.apply(classification(orientation));
            let last_valid = DiscreteOrientation::from(state.snapshot().capture_orientation());
            assert!(last_valid.is_valid_for_capture());
        }
        assert_eq!(
            state.snapshot().last_valid,
            ValidOrientation::PortraitUpsideDown
        );
    }

    #[test]
    fn test_store_publishes_whole_snapshots() {
        let store = OrientationStore::new(CameraPosition::Back);
        let handle = store.handle();
        let mut receiver = handle.subscribe();
        assert!(!receiver.has_changed().unwrap());

        store.update(classify(GravityVector::new(0.9, 0.0, 0.1)));
        assert!(receiver.has_changed().unwrap());

        let snapshot = *receiver.borrow_and_update();
        assert_eq!(snapshot.current, DiscreteOrientation::LandscapeRight);
        assert_eq!(snapshot.last_valid, ValidOrientation::LandscapeRight);
        assert_eq!(handle.video_orientation(), VideoOrientation::LandscapeLeft);
    }

    #[test]
    fn test_store_skips_unchanged_updates() {
        let store = OrientationStore::new(CameraPosition::Back);
        let mut receiver = store.handle().subscribe();

        let change = store.update(classify(GravityVector::new(0.0, -1.0, 0.0)));
        assert!(!change.any());
        assert!(!receiver.has_changed().unwrap());
    }

    #[test]
    fn test_reset_restores_default() {
        let store = OrientationStore::new(CameraPosition::Back);
        store.update(classify(GravityVector::new(-0.9, 0.0, 0.0)));
        assert_eq!(store.snapshot().last_valid, ValidOrientation::LandscapeLeft);

        store.reset();
        assert_eq!(store.snapshot(), OrientationSnapshot::default());
    }

    #[test]
    fn test_detached_handle_reports_default() {
        let handle = OrientationHandle::detached(CameraPosition::Front);
        assert_eq!(handle.capture_orientation(), ValidOrientation::Portrait);
        assert_eq!(handle.current_orientation(), DiscreteOrientation::Portrait);
        assert_eq!(handle.angle_radians(), 0.0);
        assert_eq!(handle.camera_position(), CameraPosition::Front);
    }
}
