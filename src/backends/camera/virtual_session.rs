// SPDX-License-Identifier: GPL-3.0-only

//! Virtual capture session
//!
//! Produces a synthetic gradient JPEG per capture, encoded with the requested
//! EXIF orientation attached. Permission answers, failures and capture latency
//! are scriptable so host code can exercise every coordinator path without
//! camera hardware.

use super::types::{CaptureMetadata, ImageBytes, PermissionStatus};
use super::CaptureSession;
use crate::constants::ExifOrientation;
use crate::errors::{CaptureError, CaptureResult, PhotoError};
use crate::pipelines::photo::exif;
use image::{ImageEncoder, RgbImage};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
struct PermissionState {
    status: PermissionStatus,
    /// Answer given when the user is prompted
    prompt_answer: PermissionStatus,
    prompts: usize,
}

/// Scriptable in-process capture session
#[derive(Debug)]
pub struct VirtualCaptureSession {
    permission: Mutex<PermissionState>,
    available: bool,
    running: AtomicBool,
    width: u32,
    height: u32,
    capture_delay: Duration,
    stamp_exif: bool,
    failures: Mutex<VecDeque<CaptureError>>,
    captures: AtomicUsize,
    last_metadata: Mutex<Option<CaptureMetadata>>,
}

impl VirtualCaptureSession {
    /// Authorized session producing 64×48 images
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(PermissionState {
                status: PermissionStatus::Authorized,
                prompt_answer: PermissionStatus::Authorized,
                prompts: 0,
            }),
            available: true,
            running: AtomicBool::new(false),
            width: 64,
            height: 48,
            capture_delay: Duration::ZERO,
            stamp_exif: true,
            failures: Mutex::new(VecDeque::new()),
            captures: AtomicUsize::new(0),
            last_metadata: Mutex::new(None),
        }
    }

    /// Session on a device without a camera
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Set the current permission and the answer to the next prompt
    pub fn with_permission(self, status: PermissionStatus, prompt_answer: PermissionStatus) -> Self {
        {
            let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
            permission.status = status;
            permission.prompt_answer = prompt_answer;
        }
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Block each capture for `delay` to simulate exposure time
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    /// Leave the EXIF orientation out of produced images
    pub fn without_exif(mut self) -> Self {
        self.stamp_exif = false;
        self
    }

    /// Make the next capture fail with `error`
    pub fn fail_next(&self, error: CaptureError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }

    /// Number of successful captures
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// Number of times the user was prompted
    pub fn permission_prompts(&self) -> usize {
        self.permission
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .prompts
    }

    /// Metadata of the most recent capture request
    pub fn last_metadata(&self) -> Option<CaptureMetadata> {
        *self.last_metadata.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn render_jpeg(&self, orientation: Option<ExifOrientation>) -> Result<Vec<u8>, PhotoError> {
        let (width, height) = (self.width.max(1), self.height.max(1));
        let image = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                128,
            ])
        });

        let mut buffer = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut buffer);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, 85);
            if let Some(orientation) = orientation {
                encoder
                    .set_exif_metadata(exif::orientation_chunk(orientation))
                    .map_err(|e| PhotoError::EncodingFailed(e.to_string()))?;
            }
            encoder
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| PhotoError::EncodingFailed(e.to_string()))?;
        }

        Ok(buffer)
    }
}

impl Default for VirtualCaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession for VirtualCaptureSession {
    fn permission_status(&self) -> PermissionStatus {
        self.permission
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .status
    }

    fn request_permission(&self) -> PermissionStatus {
        let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
        if permission.status == PermissionStatus::NotDetermined {
            permission.prompts += 1;
            permission.status = permission.prompt_answer;
        }
        permission.status
    }

    fn start_session(&self) -> CaptureResult<()> {
        if !self.available {
            return Err(CaptureError::HardwareUnavailable);
        }
        if !self.permission_status().is_authorized() {
            return Err(CaptureError::PermissionDenied);
        }
        if !self.running.swap(true, Ordering::SeqCst) {
            info!(width = self.width, height = self.height, "Virtual capture session started");
        }
        Ok(())
    }

    fn stop_session(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Virtual capture session stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn request_capture(&self, metadata: &CaptureMetadata) -> CaptureResult<ImageBytes> {
        *self.last_metadata.lock().unwrap_or_else(|e| e.into_inner()) = Some(*metadata);

        if !self.is_running() {
            return Err(CaptureError::SessionNotRunning);
        }
        if !self.capture_delay.is_zero() {
            std::thread::sleep(self.capture_delay);
        }
        if let Some(error) = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Err(error);
        }

        let jpeg = self.render_jpeg(self.stamp_exif.then_some(metadata.exif_orientation))?;

        self.captures.fetch_add(1, Ordering::SeqCst);
        debug!(
            request_id = %metadata.request_id,
            bytes = jpeg.len(),
            exif = metadata.exif_orientation.code(),
            "Virtual capture complete"
        );
        Ok(ImageBytes::from(jpeg))
    }

    fn name(&self) -> &str {
        "virtual"
    }
}
