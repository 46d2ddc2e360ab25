// SPDX-License-Identifier: GPL-3.0-only

//! Capture session abstraction
//!
//! The hardware session (device configuration, permission prompts, the
//! actual exposure) is platform code. This crate only drives it through the
//! [`CaptureSession`] trait:
//!
//! ```text
//! ┌─────────────────────┐
//! │ CaptureCoordinator  │  ← Orientation latching, single in-flight capture
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureSession trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!   Platform    Virtual   ← Synthetic JPEG source for hosts and tests
//! ```

pub mod types;
pub mod virtual_session;

pub use types::*;
pub use virtual_session::VirtualCaptureSession;

use crate::errors::CaptureResult;

/// Hardware capture session
///
/// Calls may block; the coordinator runs captures on a blocking thread.
pub trait CaptureSession: Send + Sync {
    // ===== Permission =====

    /// Current camera authorization
    fn permission_status(&self) -> PermissionStatus;

    /// Prompt the user for camera access
    ///
    /// Only meaningful when the status is [`PermissionStatus::NotDetermined`].
    fn request_permission(&self) -> PermissionStatus;

    // ===== Lifecycle =====

    /// Start the capture session
    fn start_session(&self) -> CaptureResult<()>;

    /// Stop the capture session, a no-op if not running
    fn stop_session(&self);

    /// Check whether the session is running
    fn is_running(&self) -> bool;

    // ===== Capture =====

    /// Capture one photo with the given metadata
    ///
    /// # Returns
    /// * `Ok(ImageBytes)` - Encoded image honoring `metadata`
    /// * `Err(CaptureError)` - Busy, no output configured, processing failure
    fn request_capture(&self, metadata: &CaptureMetadata) -> CaptureResult<ImageBytes>;

    /// Session name for logging
    fn name(&self) -> &str {
        "camera"
    }
}
