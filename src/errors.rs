// SPDX-License-Identifier: GPL-3.0-only

//! Error types for orientation tracking and photo capture
//!
//! Classification and the orientation state machine are total and never
//! fail. Everything here lives at the sensor and capture boundaries.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Main library error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Motion sensor errors
    Motion(MotionError),
    /// Capture session errors
    Capture(CaptureError),
    /// Photo metadata errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
}

/// Motion sensor errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// No accelerometer-class sensor on this device
    HardwareUnavailable,
    /// Sensor reported a failure while reading
    ReadFailed(String),
}

/// Capture session errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No camera hardware
    HardwareUnavailable,
    /// Camera access denied or restricted by the user
    PermissionDenied,
    /// Capture requested before the session was started
    SessionNotRunning,
    /// Another capture is still in flight
    Busy,
    /// The hardware capture failed
    CaptureFailed(String),
    /// Anything else
    Unknown(String),
}

/// Photo metadata errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Image data is not a JPEG stream
    NotJpeg,
    /// JPEG segment structure is broken
    MalformedJpeg(String),
    /// Exif block present but has no orientation entry to update
    MissingOrientationEntry,
    /// Encoding the image failed
    EncodingFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Motion(e) => write!(f, "Motion sensor error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::HardwareUnavailable => write!(f, "Motion hardware unavailable"),
            MotionError::ReadFailed(msg) => write!(f, "Sensor read failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::HardwareUnavailable => write!(f, "Camera hardware unavailable"),
            CaptureError::PermissionDenied => write!(f, "Camera permission denied"),
            CaptureError::SessionNotRunning => write!(f, "Capture session is not running"),
            CaptureError::Busy => write!(f, "A capture is already in progress"),
            CaptureError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CaptureError::Unknown(msg) => write!(f, "Unknown capture error: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NotJpeg => write!(f, "Image is not a JPEG"),
            PhotoError::MalformedJpeg(msg) => write!(f, "Malformed JPEG: {}", msg),
            PhotoError::MissingOrientationEntry => {
                write!(f, "Exif block has no orientation entry")
            }
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for MotionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for PhotoError {}

impl CaptureError {
    /// True for errors the caller can only fix by asking the user again
    pub fn is_permission(&self) -> bool {
        matches!(self, CaptureError::PermissionDenied)
    }
}

// Conversions from sub-errors to AppError
impl From<MotionError> for AppError {
    fn from(err: MotionError) -> Self {
        AppError::Motion(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

// A failed EXIF stamp means the capture produced unusable output
impl From<PhotoError> for CaptureError {
    fn from(err: PhotoError) -> Self {
        CaptureError::CaptureFailed(err.to_string())
    }
}
