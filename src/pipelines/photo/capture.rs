// SPDX-License-Identifier: GPL-3.0-only

//! Orientation-aware photo capture
//!
//! The coordinator owns the capture session handle. At the moment a photo is
//! requested it reads the capture orientation once, derives the EXIF tag and
//! the sensor-frame orientation, and hands that metadata to the hardware.
//! Only one capture may be in flight; a second request is rejected with
//! [`CaptureError::Busy`] rather than queued.

use crate::backends::camera::{
    CaptureMetadata, CaptureSession, CapturedPhoto, ImageBytes, PermissionStatus,
};
use crate::config::Config;
use crate::constants::CAPTURE_EVENT_CAPACITY;
use crate::errors::{CaptureError, CaptureResult, PhotoError};
use crate::orientation::OrientationHandle;
use crate::pipelines::photo::exif;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome of an accepted capture request
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// Photo captured and tagged
    Captured(CapturedPhoto),
    /// The hardware capture failed
    Failed {
        request_id: Uuid,
        error: CaptureError,
    },
}

/// Holds the single in-flight capture slot until dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Photo capture coordinator
pub struct CaptureCoordinator {
    session: Arc<dyn CaptureSession>,
    orientation: OrientationHandle,
    in_flight: Arc<AtomicBool>,
    running: watch::Sender<bool>,
    events: broadcast::Sender<CaptureEvent>,
    /// Re-tag images whose EXIF orientation does not match the request
    embed_exif: bool,
}

impl CaptureCoordinator {
    pub fn new(session: Arc<dyn CaptureSession>, orientation: OrientationHandle) -> Self {
        let (running, _) = watch::channel(session.is_running());
        let (events, _) = broadcast::channel(CAPTURE_EVENT_CAPACITY);
        Self {
            session,
            orientation,
            in_flight: Arc::new(AtomicBool::new(false)),
            running,
            events,
            embed_exif: true,
        }
    }

    /// Create a coordinator honoring `config.embed_exif`
    pub fn with_config(
        session: Arc<dyn CaptureSession>,
        orientation: OrientationHandle,
        config: &Config,
    ) -> Self {
        Self {
            embed_exif: config.embed_exif,
            ..Self::new(session, orientation)
        }
    }

    /// Check permission and start the session
    ///
    /// Prompts the user only when permission was never asked for. A denial
    /// is returned as [`CaptureError::PermissionDenied`] and not retried.
    pub fn start(&self) -> CaptureResult<()> {
        let mut status = self.session.permission_status();
        if status == PermissionStatus::NotDetermined {
            info!(session = self.session.name(), "Requesting camera permission");
            status = self.session.request_permission();
        }
        if !status.is_authorized() {
            warn!(session = self.session.name(), status = %status, "Camera permission not granted");
            return Err(CaptureError::PermissionDenied);
        }

        self.session.start_session().inspect_err(|e| {
            error!(session = self.session.name(), error = %e, "Failed to start capture session");
        })?;
        self.running.send_replace(true);
        info!(session = self.session.name(), "Capture session started");
        Ok(())
    }

    /// Stop the session, a no-op if it is not running
    pub fn stop(&self) {
        self.session.stop_session();
        if self.running.send_replace(false) {
            info!(session = self.session.name(), "Capture session stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Observe the session running state
    pub fn running(&self) -> watch::Receiver<bool> {
        self.running.subscribe()
    }

    /// Receive an event for every accepted capture request
    pub fn subscribe_events(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events.subscribe()
    }

    /// True while a capture is outstanding
    pub fn is_capturing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn orientation(&self) -> &OrientationHandle {
        &self.orientation
    }

    /// Build capture metadata from the orientation right now
    pub fn capture_metadata(&self) -> CaptureMetadata {
        let orientation = self.orientation.capture_orientation();
        CaptureMetadata {
            request_id: Uuid::new_v4(),
            requested_at: chrono::Utc::now(),
            orientation,
            video_orientation: self.orientation.video_orientation(),
            exif_orientation: orientation.exif_orientation(),
        }
    }

    /// Capture a photo tagged with the current capture orientation
    ///
    /// # Returns
    /// * `Ok(CapturedPhoto)` - Image and the metadata latched at request time
    /// * `Err(CaptureError::Busy)` - Another capture is in flight
    /// * `Err(CaptureError)` - The hardware capture failed; not retried
    pub async fn capture(&self) -> CaptureResult<CapturedPhoto> {
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Capture rejected, another capture is in flight");
            return Err(CaptureError::Busy);
        };

        let metadata = self.capture_metadata();
        info!(
            request_id = %metadata.request_id,
            orientation = %metadata.orientation,
            exif = metadata.exif_orientation.code(),
            "Capturing photo"
        );

        let session = Arc::clone(&self.session);
        // The slot stays taken until the hardware call returns, even if this
        // future is dropped first
        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            session.request_capture(&metadata)
        })
        .await
        .map_err(|e| CaptureError::Unknown(format!("capture task failed: {}", e)))
        .and_then(|result| result)
        .map(|data| self.ensure_tagged(data, &metadata));

        match result {
            Ok(data) => {
                let photo = CapturedPhoto { data, metadata };
                debug!(
                    request_id = %metadata.request_id,
                    bytes = photo.len(),
                    "Photo captured"
                );
                let _ = self.events.send(CaptureEvent::Captured(photo.clone()));
                Ok(photo)
            }
            Err(e) => {
                error!(request_id = %metadata.request_id, error = %e, "Capture failed");
                let _ = self.events.send(CaptureEvent::Failed {
                    request_id: metadata.request_id,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }
}

impl CaptureCoordinator {
    /// Write the latched orientation into `data` if the session did not
    ///
    /// Non-JPEG output passes through. A JPEG that cannot be stamped is
    /// still delivered, untagged, with a warning.
    fn ensure_tagged(&self, data: ImageBytes, metadata: &CaptureMetadata) -> ImageBytes {
        if !self.embed_exif {
            return data;
        }

        let stamped = match exif::read_orientation(&data) {
            Ok(Some(tag)) if tag == metadata.exif_orientation => return data,
            Ok(found) => {
                debug!(
                    request_id = %metadata.request_id,
                    found = ?found.map(|o| o.code()),
                    exif = metadata.exif_orientation.code(),
                    "Session output orientation does not match, stamping"
                );
                exif::set_orientation(&data, metadata.exif_orientation)
            }
            Err(e) => Err(e),
        };

        match stamped {
            Ok(jpeg) => ImageBytes::from(jpeg),
            Err(PhotoError::NotJpeg) => {
                debug!(request_id = %metadata.request_id, "Session output is not JPEG, not stamping");
                data
            }
            Err(e) => {
                warn!(
                    request_id = %metadata.request_id,
                    error = %e,
                    "Failed to stamp EXIF orientation, delivering untagged photo"
                );
                data
            }
        }
    }
}

impl std::fmt::Debug for CaptureCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCoordinator")
            .field("session", &self.session.name())
            .field("running", &self.is_running())
            .field("capturing", &self.is_capturing())
            .finish()
    }
}
