// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipelines
//!
//! ```text
//! ┌──────────────────┐     ┌────────────────────┐     ┌──────────────┐
//! │ Capture request  │ ──▶ │ CaptureCoordinator │ ──▶ │ Tagged JPEG  │
//! │ (UI / shutter)   │     │ - latch orientation│     │ + event      │
//! │                  │     │ - EXIF + sensor    │     │              │
//! │                  │     │   orientation      │     │              │
//! └──────────────────┘     └────────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Photo capture coordination and EXIF orientation stamping

pub mod photo;
