// SPDX-License-Identifier: GPL-3.0-only

//! Hardware abstraction layer
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Orientation / capture pipeline       │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │               Backend Layer                 │
//! │  ┌──────────────┐    ┌──────────────────┐   │
//! │  │    Motion    │    │     Camera       │   │
//! │  │ (gravity in) │    │ (session, photo) │   │
//! │  └──────────────┘    └──────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`motion`]: Accelerometer-class sources polled by the sampler
//! - [`camera`]: Capture session driven by the capture coordinator

pub mod camera;
pub mod motion;
