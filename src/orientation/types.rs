// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for orientation tracking

use crate::constants::ExifOrientation;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// One normalized accelerometer reading
///
/// Each axis is roughly in [-1, 1] (units of g). Samples are consumed by a
/// single classification pass and not retained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GravityVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GravityVector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for GravityVector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Coarse device orientation derived from gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiscreteOrientation {
    /// Top edge up
    #[default]
    Portrait,
    /// Top edge down
    PortraitUpsideDown,
    /// Rotated so the top edge points left
    LandscapeLeft,
    /// Rotated so the top edge points right
    LandscapeRight,
    /// Lying flat, screen up
    FaceUp,
    /// Lying flat, screen down
    FaceDown,
    /// Between thresholds
    Unknown,
}

impl DiscreteOrientation {
    pub const ALL: [DiscreteOrientation; 7] = [
        DiscreteOrientation::Portrait,
        DiscreteOrientation::PortraitUpsideDown,
        DiscreteOrientation::LandscapeLeft,
        DiscreteOrientation::LandscapeRight,
        DiscreteOrientation::FaceUp,
        DiscreteOrientation::FaceDown,
        DiscreteOrientation::Unknown,
    ];

    /// Narrow to a valid-for-capture orientation
    pub fn as_valid(&self) -> Option<ValidOrientation> {
        match self {
            DiscreteOrientation::Portrait => Some(ValidOrientation::Portrait),
            DiscreteOrientation::PortraitUpsideDown => Some(ValidOrientation::PortraitUpsideDown),
            DiscreteOrientation::LandscapeLeft => Some(ValidOrientation::LandscapeLeft),
            DiscreteOrientation::LandscapeRight => Some(ValidOrientation::LandscapeRight),
            DiscreteOrientation::FaceUp
            | DiscreteOrientation::FaceDown
            | DiscreteOrientation::Unknown => None,
        }
    }

    pub fn is_valid_for_capture(&self) -> bool {
        self.as_valid().is_some()
    }
}

impl std::fmt::Display for DiscreteOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiscreteOrientation::Portrait => "portrait",
            DiscreteOrientation::PortraitUpsideDown => "portrait upside down",
            DiscreteOrientation::LandscapeLeft => "landscape left",
            DiscreteOrientation::LandscapeRight => "landscape right",
            DiscreteOrientation::FaceUp => "face up",
            DiscreteOrientation::FaceDown => "face down",
            DiscreteOrientation::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One of the four orientations a photo can be taken in
///
/// Holding this type instead of [`DiscreteOrientation`] makes the
/// "last valid orientation is never flat or unknown" rule a type fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl ValidOrientation {
    pub const ALL: [ValidOrientation; 4] = [
        ValidOrientation::Portrait,
        ValidOrientation::PortraitUpsideDown,
        ValidOrientation::LandscapeLeft,
        ValidOrientation::LandscapeRight,
    ];

    /// Rotation (radians, clockwise positive) that matches the physical pose
    pub fn rotation_angle(&self) -> f64 {
        match self {
            ValidOrientation::Portrait => 0.0,
            ValidOrientation::PortraitUpsideDown => PI,
            ValidOrientation::LandscapeLeft => FRAC_PI_2,
            ValidOrientation::LandscapeRight => -FRAC_PI_2,
        }
    }

    /// Rotation that keeps content upright while the device is in this pose
    pub fn counter_rotation_angle(&self) -> f64 {
        -self.rotation_angle()
    }

    /// Rotation angle in whole degrees
    pub fn rotation_degrees(&self) -> i32 {
        match self {
            ValidOrientation::Portrait => 0,
            ValidOrientation::PortraitUpsideDown => 180,
            ValidOrientation::LandscapeLeft => 90,
            ValidOrientation::LandscapeRight => -90,
        }
    }

    /// EXIF orientation tag for a photo taken in this pose
    pub fn exif_orientation(&self) -> ExifOrientation {
        match self {
            ValidOrientation::Portrait => ExifOrientation::Rotate90Cw,
            ValidOrientation::PortraitUpsideDown => ExifOrientation::Rotate90Ccw,
            ValidOrientation::LandscapeLeft => ExifOrientation::Rotate180,
            ValidOrientation::LandscapeRight => ExifOrientation::Normal,
        }
    }
}

impl From<ValidOrientation> for DiscreteOrientation {
    fn from(orientation: ValidOrientation) -> Self {
        match orientation {
            ValidOrientation::Portrait => DiscreteOrientation::Portrait,
            ValidOrientation::PortraitUpsideDown => DiscreteOrientation::PortraitUpsideDown,
            ValidOrientation::LandscapeLeft => DiscreteOrientation::LandscapeLeft,
            ValidOrientation::LandscapeRight => DiscreteOrientation::LandscapeRight,
        }
    }
}

impl std::fmt::Display for ValidOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        DiscreteOrientation::from(*self).fmt(f)
    }
}

/// Which side of the device the capture sensor faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPosition {
    /// Sensor faces away from the user
    #[default]
    Back,
    /// Sensor faces the user
    Front,
}

/// Orientation in the capture sensor's frame of reference
///
/// This is what the platform capture connection expects as its video
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl VideoOrientation {
    /// Map a device orientation into the sensor frame
    ///
    /// A rear sensor sees landscape rotation mirrored, so left and right
    /// swap. Portrait poses are fixed points for both positions.
    pub fn from_device(orientation: ValidOrientation, position: CameraPosition) -> Self {
        match (position, orientation) {
            (_, ValidOrientation::Portrait) => VideoOrientation::Portrait,
            (_, ValidOrientation::PortraitUpsideDown) => VideoOrientation::PortraitUpsideDown,
            (CameraPosition::Back, ValidOrientation::LandscapeLeft) => {
                VideoOrientation::LandscapeRight
            }
            (CameraPosition::Back, ValidOrientation::LandscapeRight) => {
                VideoOrientation::LandscapeLeft
            }
            (CameraPosition::Front, ValidOrientation::LandscapeLeft) => {
                VideoOrientation::LandscapeLeft
            }
            (CameraPosition::Front, ValidOrientation::LandscapeRight) => {
                VideoOrientation::LandscapeRight
            }
        }
    }

    /// Map a sensor orientation back into the device frame
    pub fn to_device(&self, position: CameraPosition) -> ValidOrientation {
        let same_frame = match self {
            VideoOrientation::Portrait => ValidOrientation::Portrait,
            VideoOrientation::PortraitUpsideDown => ValidOrientation::PortraitUpsideDown,
            VideoOrientation::LandscapeLeft => ValidOrientation::LandscapeLeft,
            VideoOrientation::LandscapeRight => ValidOrientation::LandscapeRight,
        };
        // Both mappings are involutions
        match VideoOrientation::from_device(same_frame, position) {
            VideoOrientation::Portrait => ValidOrientation::Portrait,
            VideoOrientation::PortraitUpsideDown => ValidOrientation::PortraitUpsideDown,
            VideoOrientation::LandscapeLeft => ValidOrientation::LandscapeLeft,
            VideoOrientation::LandscapeRight => ValidOrientation::LandscapeRight,
        }
    }
}

/// Published orientation state
///
/// `last_valid` holds the most recent stable pose and is what capture uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSnapshot {
    /// Latest classification, possibly flat or unknown
    pub current: DiscreteOrientation,
    /// Most recent valid-for-capture classification
    pub last_valid: ValidOrientation,
    /// Continuous rotation angle in radians, in (-π, π]
    pub angle_radians: f64,
}

impl Default for OrientationSnapshot {
    fn default() -> Self {
        Self {
            current: DiscreteOrientation::Portrait,
            last_valid: ValidOrientation::Portrait,
            angle_radians: 0.0,
        }
    }
}

impl OrientationSnapshot {
    /// Orientation to stamp on a capture
    pub fn capture_orientation(&self) -> ValidOrientation {
        self.last_valid
    }

    /// Capture orientation expressed in the sensor frame
    pub fn video_orientation(&self, position: CameraPosition) -> VideoOrientation {
        VideoOrientation::from_device(self.last_valid, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_four_orientations_are_valid() {
        let valid: Vec<_> = DiscreteOrientation::ALL
            .iter()
            .filter(|o| o.is_valid_for_capture())
            .collect();
        assert_eq!(valid.len(), 4);
        assert!(!DiscreteOrientation::FaceUp.is_valid_for_capture());
        assert!(!DiscreteOrientation::FaceDown.is_valid_for_capture());
        assert!(!DiscreteOrientation::Unknown.is_valid_for_capture());
    }

    #[test]
    fn test_counter_rotation_cancels_rotation() {
        for orientation in ValidOrientation::ALL {
            assert_eq!(
                orientation.rotation_angle() + orientation.counter_rotation_angle(),
                0.0
            );
            assert!(
                (orientation.rotation_angle().to_degrees()
                    - orientation.rotation_degrees() as f64)
                    .abs()
                    < 1e-9
            );
        }
    }

    #[test]
    fn test_back_camera_swaps_landscape() {
        let back = CameraPosition::Back;
        assert_eq!(
            VideoOrientation::from_device(ValidOrientation::LandscapeLeft, back),
            VideoOrientation::LandscapeRight
        );
        assert_eq!(
            VideoOrientation::from_device(ValidOrientation::LandscapeRight, back),
            VideoOrientation::LandscapeLeft
        );
        assert_eq!(
            VideoOrientation::from_device(ValidOrientation::Portrait, back),
            VideoOrientation::Portrait
        );
        assert_eq!(
            VideoOrientation::from_device(ValidOrientation::PortraitUpsideDown, back),
            VideoOrientation::PortraitUpsideDown
        );
    }

    #[test]
    fn test_sensor_mapping_round_trips() {
        for position in [CameraPosition::Back, CameraPosition::Front] {
            for orientation in ValidOrientation::ALL {
                let video = VideoOrientation::from_device(orientation, position);
                assert_eq!(video.to_device(position), orientation);
            }
        }
    }

    #[test]
    fn test_front_camera_keeps_landscape() {
        assert_eq!(
            VideoOrientation::from_device(ValidOrientation::LandscapeLeft, CameraPosition::Front),
            VideoOrientation::LandscapeLeft
        );
    }

    #[test]
    fn test_exif_table() {
        assert_eq!(ValidOrientation::Portrait.exif_orientation().code(), 6);
        assert_eq!(ValidOrientation::PortraitUpsideDown.exif_orientation().code(), 8);
        assert_eq!(ValidOrientation::LandscapeLeft.exif_orientation().code(), 3);
        assert_eq!(ValidOrientation::LandscapeRight.exif_orientation().code(), 1);
    }
}
