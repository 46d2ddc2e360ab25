// SPDX-License-Identifier: GPL-3.0-only

//! Library-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gravity magnitude on the z axis above which the device counts as lying flat
pub const FLAT_THRESHOLD: f64 = 0.8;

/// Gravity magnitude on the x or y axis needed to classify an upright orientation
pub const TILT_THRESHOLD: f64 = 0.6;

/// Sample interval used for smooth (continuous) rotation
pub const SMOOTH_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Sample interval used when only discrete orientation is needed
pub const COARSE_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest accepted sampling interval
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Duration of the discrete rotation animation
pub const ROTATION_ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Longest rotation animation accepted by configuration validation
pub const MAX_ROTATION_ANIMATION: Duration = Duration::from_secs(2);

/// Capacity of the capture event broadcast channel
pub const CAPTURE_EVENT_CAPACITY: usize = 16;

/// How often the motion source is polled
///
/// The two named presets match the cadences used by the rotating widgets:
/// 100 ms keeps continuous rotation smooth, 500 ms is enough for the
/// four-way discrete layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// 100 ms cadence
    #[default]
    Smooth,
    /// 500 ms cadence
    Coarse,
    /// Caller-supplied cadence in milliseconds
    Custom { interval_ms: u64 },
}

impl SamplingMode {
    /// All named presets for UI iteration
    pub const PRESETS: [SamplingMode; 2] = [SamplingMode::Smooth, SamplingMode::Coarse];

    /// Get the polling interval for this mode
    pub fn interval(&self) -> Duration {
        match self {
            SamplingMode::Smooth => SMOOTH_SAMPLE_INTERVAL,
            SamplingMode::Coarse => COARSE_SAMPLE_INTERVAL,
            SamplingMode::Custom { interval_ms } => Duration::from_millis(*interval_ms),
        }
    }

    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            SamplingMode::Smooth => "Smooth",
            SamplingMode::Coarse => "Coarse",
            SamplingMode::Custom { .. } => "Custom",
        }
    }
}

/// EXIF orientation tag values (TIFF tag 0x0112)
///
/// Only the four non-mirrored rotations are produced by capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExifOrientation {
    /// Code 1: image stored upright
    Normal,
    /// Code 3: rotate 180° to display
    Rotate180,
    /// Code 6: rotate 90° clockwise to display
    Rotate90Cw,
    /// Code 8: rotate 90° counter-clockwise to display
    Rotate90Ccw,
}

impl ExifOrientation {
    pub const ALL: [ExifOrientation; 4] = [
        ExifOrientation::Normal,
        ExifOrientation::Rotate180,
        ExifOrientation::Rotate90Cw,
        ExifOrientation::Rotate90Ccw,
    ];

    /// Standard EXIF code
    pub fn code(&self) -> u16 {
        match self {
            ExifOrientation::Normal => 1,
            ExifOrientation::Rotate180 => 3,
            ExifOrientation::Rotate90Cw => 6,
            ExifOrientation::Rotate90Ccw => 8,
        }
    }

    /// Parse a standard EXIF code, ignoring the mirrored variants
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(ExifOrientation::Normal),
            3 => Some(ExifOrientation::Rotate180),
            6 => Some(ExifOrientation::Rotate90Cw),
            8 => Some(ExifOrientation::Rotate90Ccw),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExifOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EXIF {}", self.code())
    }
}
