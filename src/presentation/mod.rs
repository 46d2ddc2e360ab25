// SPDX-License-Identifier: GPL-3.0-only

//! Presentation helpers driven by device orientation

pub mod rotation;

pub use rotation::{RotatableContent, RotationMode, RotationPresenter, RotationTransform};
