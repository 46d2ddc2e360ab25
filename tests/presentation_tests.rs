// SPDX-License-Identifier: MPL-2.0

//! Integration tests for rotation presentation

use camera_orientation::backends::motion::ScriptedMotionSource;
use camera_orientation::presentation::{
    RotatableContent, RotationMode, RotationPresenter, RotationTransform,
};
use camera_orientation::{Config, GravityVector, OrientationTracker};
use futures::StreamExt;
use std::f64::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn tracker(source: &Arc<ScriptedMotionSource>) -> OrientationTracker {
    let config = Config {
        sampling: camera_orientation::SamplingMode::Custom { interval_ms: 5 },
        ..Config::default()
    };
    OrientationTracker::new(source.clone(), &config)
}

#[tokio::test]
async fn test_discrete_stream_follows_device() {
    let source = Arc::new(ScriptedMotionSource::new([]));
    let mut tracker = tracker(&source);
    tracker.start();

    let presenter = RotationPresenter::new(&Config::default());
    assert_eq!(presenter.mode(), RotationMode::Discrete);
    let mut transforms = std::pin::pin!(presenter.transforms(tracker.handle()));

    let initial = transforms.next().await.unwrap();
    assert_eq!(initial, RotationTransform::immediate(0.0));

    source.push(GravityVector::new(-0.9, 0.0, 0.1));
    let turned = tokio::time::timeout(Duration::from_secs(2), transforms.next())
        .await
        .unwrap()
        .unwrap();
    assert!((turned.angle_radians - FRAC_PI_2).abs() < 1e-9);
    assert_eq!(turned.animation, Some(Duration::from_millis(200)));
    tracker.stop();
}

#[derive(Clone, Default)]
struct Icon {
    applied: Arc<Mutex<Vec<RotationTransform>>>,
}

impl RotatableContent for Icon {
    fn apply_rotation(&mut self, transform: &RotationTransform) {
        self.applied.lock().unwrap().push(*transform);
    }
}

#[tokio::test]
async fn test_drive_ends_with_tracker() {
    let source = Arc::new(ScriptedMotionSource::new([GravityVector::new(0.9, 0.0, 0.1)]));
    let mut tracker = tracker(&source);
    let handle = tracker.handle();
    let icon = Icon::default();

    let presenter = RotationPresenter::with_options(RotationMode::Continuous, Duration::ZERO, true);
    let mut content = icon.clone();
    let driver = tokio::spawn(async move {
        presenter.drive(handle, &mut content).await;
    });

    tracker.start();
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while source.pending() > 0 {
        assert!(std::time::Instant::now() < deadline);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(tracker);

    tokio::time::timeout(Duration::from_secs(2), driver)
        .await
        .expect("drive did not finish")
        .unwrap();
    let applied = icon.applied.lock().unwrap();
    assert!(!applied.is_empty());
    assert!(applied.iter().all(|t| !t.is_animated()));
    assert!((applied.last().unwrap().angle_radians + FRAC_PI_2).abs() < 1e-9);
}
