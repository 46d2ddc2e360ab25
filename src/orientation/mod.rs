// SPDX-License-Identifier: GPL-3.0-only

//! Device orientation tracking
//!
//! ```text
//! MotionSource ──► MotionSampler ──► classify() ──► OrientationStore
//!  (sensor)        (bg thread)       (pure)          (single writer)
//!                                                        │
//!                                     ┌──────────────────┴───────────┐
//!                                     ▼                              ▼
//!                          CaptureCoordinator               RotationPresenter
//!                        (reads at capture time)          (follows every change)
//! ```
//!
//! The published [`OrientationSnapshot`] carries the latest pose (which may
//! be flat or unknown), the last pose that is valid for capture, and a
//! continuous rotation angle.

pub mod classifier;
pub mod sampler;
pub mod state;
pub mod tracker;
pub mod types;

pub use classifier::{Classification, classify};
pub use sampler::MotionSampler;
pub use state::{OrientationHandle, OrientationState, OrientationStore, StateChange};
pub use tracker::{OrientationTracker, TrackingStatus};
pub use types::*;
