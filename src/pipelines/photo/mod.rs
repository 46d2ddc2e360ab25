// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture pipeline
//!
//! 1. **Latch**: read the capture orientation when the shutter is pressed
//! 2. **Capture**: run the hardware capture on a blocking thread
//! 3. **Tag**: the session writes the EXIF orientation into the image
//! 4. **Publish**: return the photo and broadcast a [`CaptureEvent`]

pub mod capture;
pub mod exif;

pub use capture::{CaptureCoordinator, CaptureEvent};
