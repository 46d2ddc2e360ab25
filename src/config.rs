// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{
    MAX_ROTATION_ANIMATION, MIN_SAMPLE_INTERVAL, ROTATION_ANIMATION_DURATION, SamplingMode,
};
use crate::errors::{AppError, AppResult};
use crate::orientation::CameraPosition;
use crate::presentation::RotationMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Library configuration
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Motion sampling cadence
    pub sampling: SamplingMode,
    /// How presented content follows the device
    pub rotation_mode: RotationMode,
    /// Discrete rotation animation length in milliseconds
    pub rotation_animation_ms: u64,
    /// Side of the device the capture sensor faces
    pub camera_position: CameraPosition,
    /// Rotate presented content when the device is upside down
    pub upside_down_presentation: bool,
    /// Write the orientation tag into captured JPEGs
    pub embed_exif: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling: SamplingMode::default(),
            rotation_mode: RotationMode::default(),
            rotation_animation_ms: ROTATION_ANIMATION_DURATION.as_millis() as u64,
            camera_position: CameraPosition::default(),
            upside_down_presentation: true,
            embed_exif: true,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.sample_interval() < MIN_SAMPLE_INTERVAL {
            return Err(AppError::Config(format!(
                "sample interval must be at least {} ms",
                MIN_SAMPLE_INTERVAL.as_millis()
            )));
        }
        if self.rotation_animation() > MAX_ROTATION_ANIMATION {
            return Err(AppError::Config(format!(
                "rotation animation of {} ms exceeds {} ms",
                self.rotation_animation_ms,
                MAX_ROTATION_ANIMATION.as_millis()
            )));
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        self.sampling.interval()
    }

    pub fn rotation_animation(&self) -> Duration {
        Duration::from_millis(self.rotation_animation_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = Config::from_json_str(r#"{ "sampling": "coarse" }"#).unwrap();
        assert_eq!(config.sample_interval(), Duration::from_millis(500));
        assert_eq!(config.rotation_animation_ms, 200);
        assert!(config.embed_exif);
    }

    #[test]
    fn test_custom_interval() {
        let config =
            Config::from_json_str(r#"{ "sampling": { "custom": { "interval_ms": 40 } } }"#)
                .unwrap();
        assert_eq!(config.sample_interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let result = Config::from_json_str(r#"{ "sampling": { "custom": { "interval_ms": 0 } } }"#);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_long_animation() {
        let config = Config {
            rotation_animation_ms: 5_000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config {
            camera_position: CameraPosition::Front,
            rotation_mode: RotationMode::Continuous,
            ..Config::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }
}
