// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for capture sessions

use crate::constants::ExifOrientation;
use crate::orientation::{ValidOrientation, VideoOrientation};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Encoded image bytes as returned by the hardware (typically JPEG)
pub type ImageBytes = Arc<[u8]>;

/// Camera access authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    Authorized,
    Denied,
    /// Blocked by policy, the user cannot grant it
    Restricted,
}

impl PermissionStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(self, PermissionStatus::Authorized)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::NotDetermined => write!(f, "not determined"),
            PermissionStatus::Authorized => write!(f, "authorized"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

/// Metadata attached to a capture request
///
/// Orientation is latched when the request is made, not when the exposure
/// completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureMetadata {
    /// Correlates logs and events for one capture
    pub request_id: Uuid,
    /// When the capture was requested
    pub requested_at: DateTime<Utc>,
    /// Device orientation at request time
    pub orientation: ValidOrientation,
    /// The same orientation in the sensor frame
    pub video_orientation: VideoOrientation,
    /// Tag to write into the image
    pub exif_orientation: ExifOrientation,
}

/// A finished capture
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub data: ImageBytes,
    pub metadata: CaptureMetadata,
}

impl CapturedPhoto {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
