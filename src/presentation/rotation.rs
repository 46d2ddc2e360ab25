// SPDX-License-Identifier: GPL-3.0-only

//! Rotation of presented content independent of the interface lock
//!
//! The surrounding layout stays fixed while individual pieces of content
//! (shutter icons, thumbnails, overlays) turn with the device. The presenter
//! only observes the published orientation; it never writes it.

use crate::config::Config;
use crate::orientation::{OrientationHandle, OrientationSnapshot, ValidOrientation};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;
use tracing::debug;

/// How content follows the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Snap between the four upright poses with a short animation
    #[default]
    Discrete,
    /// Follow the continuous angle on every sample, unanimated
    Continuous,
}

/// A rotation to apply to presented content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    /// Angle the content is rotating from
    pub from_radians: f64,
    /// Angle the content ends at
    pub angle_radians: f64,
    /// Animation length, `None` to apply immediately
    pub animation: Option<Duration>,
}

impl RotationTransform {
    /// Unanimated transform to `angle`
    pub fn immediate(angle_radians: f64) -> Self {
        Self {
            from_radians: angle_radians,
            angle_radians,
            animation: None,
        }
    }

    /// Angle to draw `elapsed` into the animation, with ease-in-out timing
    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        let Some(duration) = self.animation.filter(|d| !d.is_zero()) else {
            return self.angle_radians;
        };
        let t = (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.from_radians + (self.angle_radians - self.from_radians) * eased
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

/// Something that can be rotated on screen
pub trait RotatableContent {
    fn apply_rotation(&mut self, transform: &RotationTransform);
}

/// Turns orientation updates into content transforms
///
/// The mode is fixed at construction.
#[derive(Debug, Clone)]
pub struct RotationPresenter {
    mode: RotationMode,
    animation: Duration,
    upside_down: bool,
    /// Pose currently presented (discrete mode)
    presented_pose: Option<ValidOrientation>,
    /// Angle currently presented, unwrapped in discrete mode
    presented_angle: Option<f64>,
}

impl RotationPresenter {
    pub fn new(config: &Config) -> Self {
        Self::with_options(
            config.rotation_mode,
            config.rotation_animation(),
            config.upside_down_presentation,
        )
    }

    pub fn with_options(mode: RotationMode, animation: Duration, upside_down: bool) -> Self {
        Self {
            mode,
            animation,
            upside_down,
            presented_pose: None,
            presented_angle: None,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Transform to apply for `snapshot`, or `None` when nothing changes
    ///
    /// The first transform is always applied immediately.
    pub fn next_transform(&mut self, snapshot: &OrientationSnapshot) -> Option<RotationTransform> {
        match self.mode {
            RotationMode::Discrete => self.next_discrete(snapshot.last_valid),
            RotationMode::Continuous => self.next_continuous(snapshot.angle_radians),
        }
    }

    fn next_discrete(&mut self, pose: ValidOrientation) -> Option<RotationTransform> {
        if pose == ValidOrientation::PortraitUpsideDown && !self.upside_down {
            if self.presented_pose.is_some() {
                return None;
            }
            // Nothing shown yet, start upright
            return Some(self.present_discrete(ValidOrientation::Portrait, 0.0, None));
        }
        if self.presented_pose == Some(pose) {
            return None;
        }

        let target = pose.rotation_angle();
        let transform = match self.presented_angle {
            Some(previous) => {
                let unwrapped = previous + shortest_delta(previous, target);
                self.present_discrete(pose, unwrapped, Some(previous))
            }
            None => self.present_discrete(pose, target, None),
        };
        debug!(pose = %pose, angle = transform.angle_radians, "Presenting rotation");
        Some(transform)
    }

    fn present_discrete(
        &mut self,
        pose: ValidOrientation,
        angle: f64,
        from: Option<f64>,
    ) -> RotationTransform {
        self.presented_pose = Some(pose);
        self.presented_angle = Some(angle);
        match from {
            Some(from_radians) => RotationTransform {
                from_radians,
                angle_radians: angle,
                animation: Some(self.animation),
            },
            None => RotationTransform::immediate(angle),
        }
    }

    fn next_continuous(&mut self, angle: f64) -> Option<RotationTransform> {
        if self.presented_angle == Some(angle) {
            return None;
        }
        self.presented_angle = Some(angle);
        Some(RotationTransform::immediate(angle))
    }

    /// Stream of transforms following `handle`
    ///
    /// Yields the transform for the current snapshot first, then one per
    /// relevant change. Ends when the orientation store goes away.
    pub fn transforms(
        mut self,
        handle: OrientationHandle,
    ) -> impl Stream<Item = RotationTransform> + Send + 'static {
        let mut receiver = handle.subscribe();
        async_stream::stream! {
            let snapshot = *receiver.borrow_and_update();
            if let Some(transform) = self.next_transform(&snapshot) {
                yield transform;
            }
            while receiver.changed().await.is_ok() {
                let snapshot = *receiver.borrow_and_update();
                if let Some(transform) = self.next_transform(&snapshot) {
                    yield transform;
                }
            }
        }
    }

    /// Apply transforms to `content` until the orientation store goes away
    pub async fn drive<C>(self, handle: OrientationHandle, content: &mut C)
    where
        C: RotatableContent + ?Sized,
    {
        let mut stream = std::pin::pin!(self.transforms(handle));
        while let Some(transform) = stream.next().await {
            content.apply_rotation(&transform);
        }
    }
}

/// Signed angle from `from` to `to` along the shorter arc, in (-π, π]
fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(2.0 * PI);
    if delta > PI { delta - 2.0 * PI } else { delta }
}
