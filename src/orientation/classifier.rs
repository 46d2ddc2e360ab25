// SPDX-License-Identifier: GPL-3.0-only

//! Gravity vector classification
//!
//! Stateless mapping from one accelerometer sample to a discrete pose and a
//! continuous rotation angle. Thresholds are checked in a fixed priority
//! order because several can hold at once near the cube edges.

use super::types::{DiscreteOrientation, GravityVector};
use crate::constants::{FLAT_THRESHOLD, TILT_THRESHOLD};
use std::f64::consts::PI;

/// Result of classifying one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub orientation: DiscreteOrientation,
    pub angle_radians: f64,
}

/// Classify a gravity sample into a pose and an angle
pub fn classify(gravity: GravityVector) -> Classification {
    Classification {
        orientation: discrete_orientation(gravity),
        angle_radians: rotation_angle(gravity),
    }
}

/// Discrete pose for a gravity sample, first matching rule wins
pub fn discrete_orientation(gravity: GravityVector) -> DiscreteOrientation {
    let GravityVector { x, y, z } = gravity;

    if z.abs() > FLAT_THRESHOLD {
        if z < 0.0 {
            DiscreteOrientation::FaceUp
        } else {
            DiscreteOrientation::FaceDown
        }
    } else if y < -TILT_THRESHOLD {
        DiscreteOrientation::Portrait
    } else if y > TILT_THRESHOLD {
        DiscreteOrientation::PortraitUpsideDown
    } else if x < -TILT_THRESHOLD {
        DiscreteOrientation::LandscapeLeft
    } else if x > TILT_THRESHOLD {
        DiscreteOrientation::LandscapeRight
    } else {
        DiscreteOrientation::Unknown
    }
}

/// Continuous rotation angle in (-π, π]
///
/// Zero is portrait-up and the angle grows with clockwise physical rotation.
/// Undefined at x = y = 0, where it reports 0.
pub fn rotation_angle(gravity: GravityVector) -> f64 {
    let angle = -gravity.x.atan2(-gravity.y);
    if angle <= -PI { angle + 2.0 * PI } else { angle }
}
