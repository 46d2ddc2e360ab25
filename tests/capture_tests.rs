// SPDX-License-Identifier: MPL-2.0

//! Integration tests for orientation-aware capture

use camera_orientation::backends::camera::{PermissionStatus, VirtualCaptureSession};
use camera_orientation::backends::motion::ScriptedMotionSource;
use camera_orientation::pipelines::photo::exif;
use camera_orientation::{
    CaptureCoordinator, CaptureError, CaptureEvent, Config, ExifOrientation, GravityVector,
    OrientationTracker, ValidOrientation,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn config() -> Config {
    Config {
        sampling: camera_orientation::SamplingMode::Custom { interval_ms: 5 },
        ..Config::default()
    }
}

async fn wait_for_pose(tracker: &OrientationTracker, pose: ValidOrientation) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while tracker.handle().capture_orientation() != pose {
        assert!(Instant::now() < deadline, "never reached {}", pose);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_capture_follows_device_pose() {
    let source = Arc::new(ScriptedMotionSource::new([]));
    let mut tracker = OrientationTracker::new(source.clone(), &config());
    tracker.start();

    let session = Arc::new(VirtualCaptureSession::new());
    let coordinator = CaptureCoordinator::with_config(session.clone(), tracker.handle(), &config());
    coordinator.start().unwrap();

    let portrait = coordinator.capture().await.unwrap();
    assert_eq!(portrait.metadata.exif_orientation.code(), 6);
    assert_eq!(
        exif::read_orientation(&portrait.data).unwrap(),
        Some(ExifOrientation::Rotate90Cw)
    );

    source.push(GravityVector::new(0.9, 0.0, 0.1));
    wait_for_pose(&tracker, ValidOrientation::LandscapeRight).await;
    let landscape = coordinator.capture().await.unwrap();
    assert_eq!(landscape.metadata.exif_orientation.code(), 1);
    assert_ne!(portrait.metadata.request_id, landscape.metadata.request_id);

    // Flat on the table: the last upright pose still applies
    source.push(GravityVector::new(0.0, 0.0, -0.95));
    let deadline = Instant::now() + Duration::from_secs(2);
    while source.pending() > 0 {
        assert!(Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let flat = coordinator.capture().await.unwrap();
    assert_eq!(flat.metadata.orientation, ValidOrientation::LandscapeRight);

    assert_eq!(session.captures(), 3);
    coordinator.stop();
    tracker.stop();
}

#[tokio::test]
async fn test_events_are_broadcast() {
    let source = Arc::new(ScriptedMotionSource::unavailable());
    let mut tracker = OrientationTracker::new(source, &config());
    tracker.start();

    let coordinator =
        CaptureCoordinator::new(Arc::new(VirtualCaptureSession::new()), tracker.handle());
    coordinator.start().unwrap();
    let mut first = coordinator.subscribe_events();
    let mut second = coordinator.subscribe_events();

    let photo = coordinator.capture().await.unwrap();
    for events in [&mut first, &mut second] {
        match events.recv().await.unwrap() {
            CaptureEvent::Captured(event) => {
                assert_eq!(event.metadata.request_id, photo.metadata.request_id)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_permission_granted_on_first_prompt() {
    let session = Arc::new(
        VirtualCaptureSession::new()
            .with_permission(PermissionStatus::NotDetermined, PermissionStatus::Authorized),
    );
    let tracker = OrientationTracker::new(Arc::new(ScriptedMotionSource::new([])), &config());
    let coordinator = CaptureCoordinator::new(session.clone(), tracker.handle());

    coordinator.start().unwrap();
    coordinator.stop();
    coordinator.start().unwrap();
    assert_eq!(session.permission_prompts(), 1);
    assert!(coordinator.capture().await.is_ok());
}

#[tokio::test]
async fn test_restricted_permission() {
    let session = Arc::new(
        VirtualCaptureSession::new()
            .with_permission(PermissionStatus::Restricted, PermissionStatus::Authorized),
    );
    let tracker = OrientationTracker::new(Arc::new(ScriptedMotionSource::new([])), &config());
    let coordinator = CaptureCoordinator::new(session.clone(), tracker.handle());

    let error = coordinator.start().unwrap_err();
    assert!(error.is_permission());
    assert_eq!(session.permission_prompts(), 0);
    assert_eq!(
        coordinator.capture().await.unwrap_err(),
        CaptureError::SessionNotRunning
    );
}
