// SPDX-License-Identifier: MPL-2.0

//! Integration tests for orientation tracking

use camera_orientation::backends::motion::ScriptedMotionSource;
use camera_orientation::orientation::{
    CameraPosition, OrientationHandle, OrientationSnapshot, TrackingStatus,
};
use camera_orientation::{
    DiscreteOrientation, GravityVector, OrientationTracker, ValidOrientation, VideoOrientation,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const INTERVAL: Duration = Duration::from_millis(5);

fn tracker(source: &Arc<ScriptedMotionSource>) -> OrientationTracker {
    OrientationTracker::with_interval(source.clone(), INTERVAL, CameraPosition::Back)
}

/// Poll until `done` holds for the published snapshot
fn wait_for(handle: &OrientationHandle, done: impl Fn(&OrientationSnapshot) -> bool) -> OrientationSnapshot {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let snapshot = handle.snapshot();
        if done(&snapshot) {
            return snapshot;
        }
        assert!(Instant::now() < deadline, "timed out, last snapshot {:?}", snapshot);
        std::thread::sleep(INTERVAL);
    }
}

fn drained(source: &ScriptedMotionSource) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while source.pending() > 0 {
        assert!(Instant::now() < deadline, "samples not consumed");
        std::thread::sleep(INTERVAL);
    }
}

#[test]
fn test_portrait_sample() {
    let source = Arc::new(ScriptedMotionSource::new([
        GravityVector::new(0.9, 0.0, 0.1),
        GravityVector::new(0.0, -0.9, 0.1),
    ]));
    let mut tracker = tracker(&source);
    tracker.start();
    assert_eq!(tracker.status(), TrackingStatus::Running);

    drained(&source);
    let snapshot = wait_for(&tracker.handle(), |s| {
        s.current == DiscreteOrientation::Portrait
    });
    assert_eq!(snapshot.last_valid, ValidOrientation::Portrait);
    tracker.stop();
}

#[test]
fn test_landscape_right_maps_to_sensor_left() {
    let source = Arc::new(ScriptedMotionSource::new([GravityVector::new(0.9, 0.0, 0.1)]));
    let mut tracker = tracker(&source);
    tracker.start();

    let handle = tracker.handle();
    wait_for(&handle, |s| s.current == DiscreteOrientation::LandscapeRight);
    assert_eq!(handle.capture_orientation(), ValidOrientation::LandscapeRight);
    assert_eq!(handle.video_orientation(), VideoOrientation::LandscapeLeft);
    tracker.stop();
}

#[test]
fn test_face_down_keeps_capture_orientation() {
    let source = Arc::new(ScriptedMotionSource::new([
        GravityVector::new(-0.9, 0.0, 0.1),
        GravityVector::new(0.0, 0.0, 0.95),
    ]));
    let mut tracker = tracker(&source);
    tracker.start();

    drained(&source);
    let handle = tracker.handle();
    wait_for(&handle, |s| s.current == DiscreteOrientation::FaceDown);
    assert_eq!(handle.last_valid_orientation(), ValidOrientation::LandscapeLeft);
    assert_eq!(handle.capture_orientation(), ValidOrientation::LandscapeLeft);
    tracker.stop();
}

#[test]
fn test_stop_twice_delivers_nothing_more() {
    let source = Arc::new(ScriptedMotionSource::new([GravityVector::new(0.0, -0.9, 0.1)]));
    let mut tracker = tracker(&source);
    tracker.start();
    drained(&source);

    tracker.stop();
    tracker.stop();
    assert_eq!(tracker.status(), TrackingStatus::Idle);
    assert!(!tracker.is_tracking());

    let before = tracker.snapshot();
    source.push(GravityVector::new(0.9, 0.0, 0.1));
    std::thread::sleep(INTERVAL * 10);
    assert_eq!(source.pending(), 1, "stopped tracker must not read samples");
    assert_eq!(tracker.snapshot(), before);
}

#[test]
fn test_missing_sensor_defaults_to_portrait() {
    let source = Arc::new(ScriptedMotionSource::unavailable());
    let mut tracker = tracker(&source);
    tracker.start();

    assert_eq!(tracker.status(), TrackingStatus::HardwareUnavailable);
    assert_eq!(tracker.handle().capture_orientation(), ValidOrientation::Portrait);
    tracker.stop();
}

#[test]
fn test_restart_resets_to_portrait() {
    let source = Arc::new(ScriptedMotionSource::new([GravityVector::new(0.9, 0.0, 0.1)]));
    let mut tracker = tracker(&source);
    tracker.start();
    wait_for(&tracker.handle(), |s| {
        s.last_valid == ValidOrientation::LandscapeRight
    });
    tracker.stop();

    tracker.start();
    assert_eq!(tracker.snapshot().last_valid, ValidOrientation::Portrait);
    tracker.stop();
}

#[tokio::test]
async fn test_subscribers_see_changes() {
    let source = Arc::new(ScriptedMotionSource::new([]));
    let mut tracker = tracker(&source);
    tracker.start();
    let mut updates = tracker.handle().subscribe();

    source.push(GravityVector::new(0.0, 0.9, 0.1));
    tokio::time::timeout(Duration::from_secs(2), updates.changed())
        .await
        .expect("no update published")
        .unwrap();
    assert_eq!(
        updates.borrow().last_valid,
        ValidOrientation::PortraitUpsideDown
    );
    tracker.stop();
}
