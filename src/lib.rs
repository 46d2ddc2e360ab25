// SPDX-License-Identifier: GPL-3.0-only

//! Orientation-aware photo capture for mobile camera sessions
//!
//! This library tracks device orientation from an accelerometer, keeps a
//! debounced "last valid" orientation for capture, tags photos with the
//! matching EXIF orientation and drives UI rotation independently of the
//! interface orientation lock.
//!
//! # Architecture
//!
//! - [`orientation`]: Sampling, classification and the orientation state machine
//! - [`backends`]: Motion source and capture session abstractions
//! - [`pipelines`]: Capture coordination and EXIF stamping
//! - [`presentation`]: Rotation transforms for on-screen content
//! - [`config`]: Library configuration
//!
//! # Example
//!
//! ```ignore
//! let config = Config::default();
//! let mut tracker = OrientationTracker::new(motion_source, &config);
//! tracker.start();
//!
//! let coordinator = CaptureCoordinator::new(camera_session, tracker.handle());
//! coordinator.start()?;
//! let photo = coordinator.capture().await?;
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod orientation;
pub mod pipelines;
pub mod presentation;

// Re-export commonly used types
pub use config::Config;
pub use constants::{ExifOrientation, SamplingMode};
pub use errors::{AppError, AppResult, CaptureError, MotionError};
pub use orientation::{
    DiscreteOrientation, GravityVector, OrientationHandle, OrientationTracker, ValidOrientation,
    VideoOrientation,
};
pub use pipelines::photo::{CaptureCoordinator, CaptureEvent};
pub use presentation::{RotationMode, RotationPresenter};
