// SPDX-License-Identifier: GPL-3.0-only

//! EXIF orientation stamping for JPEG data
//!
//! Reading goes through `image::metadata::Orientation`. Writing updates the
//! Orientation entry (0x0112) of an existing Exif block in place, in the
//! block's own byte order, so every other tag survives. A JPEG without an
//! Exif block gets a minimal one holding only the orientation.

use crate::constants::ExifOrientation;
use crate::errors::PhotoError;
use image::metadata::Orientation;
use tracing::debug;

const MARKER_SOI: u8 = 0xD8;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;

const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";
const TAG_ORIENTATION: u16 = 0x0112;
const TYPE_SHORT: u16 = 3;

/// One marker segment before the scan data
struct Segment {
    marker: u8,
    /// Offset of the 0xFF byte directly before the marker
    start: usize,
    /// Offset one past the segment payload
    end: usize,
}

impl Segment {
    fn payload<'a>(&self, jpeg: &'a [u8]) -> &'a [u8] {
        &jpeg[self.start + 4..self.end]
    }

    fn is_exif(&self, jpeg: &[u8]) -> bool {
        self.marker == MARKER_APP1 && self.payload(jpeg).starts_with(EXIF_HEADER)
    }

    /// Offset of the TIFF header inside the file
    fn tiff_start(&self) -> usize {
        self.start + 4 + EXIF_HEADER.len()
    }
}

/// Walk the header segments up to the start of scan
fn header_segments(jpeg: &[u8]) -> Result<Vec<Segment>, PhotoError> {
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != MARKER_SOI {
        return Err(PhotoError::NotJpeg);
    }

    let mut segments = Vec::new();
    let mut pos = 2;
    while pos + 2 <= jpeg.len() {
        if jpeg[pos] != 0xFF {
            return Err(PhotoError::MalformedJpeg(format!(
                "expected marker at offset {}",
                pos
            )));
        }
        // Any number of 0xFF fill bytes may precede a marker
        while pos + 1 < jpeg.len() && jpeg[pos + 1] == 0xFF {
            pos += 1;
        }
        if pos + 2 > jpeg.len() {
            break;
        }

        let marker = jpeg[pos + 1];
        if marker == MARKER_SOS || marker == MARKER_EOI {
            break;
        }
        if pos + 4 > jpeg.len() {
            return Err(PhotoError::MalformedJpeg(format!(
                "segment 0x{:02X} has no length",
                marker
            )));
        }
        let length = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        let end = pos + 2 + length;
        if length < 2 || end > jpeg.len() {
            return Err(PhotoError::MalformedJpeg(format!(
                "segment 0x{:02X} overruns data",
                marker
            )));
        }
        segments.push(Segment {
            marker,
            start: pos,
            end,
        });
        pos = end;
    }
    Ok(segments)
}

/// Minimal big-endian TIFF block whose IFD0 holds only the orientation
///
/// This is the raw Exif chunk as taken by
/// `image::ImageEncoder::set_exif_metadata`, without the `Exif\0\0` prefix.
pub fn orientation_chunk(orientation: ExifOrientation) -> Vec<u8> {
    let mut tiff = Vec::with_capacity(26);
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&TAG_ORIENTATION.to_be_bytes());
    tiff.extend_from_slice(&TYPE_SHORT.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.code().to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    // No next IFD
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff
}

fn orientation_segment(orientation: ExifOrientation) -> Vec<u8> {
    let tiff = orientation_chunk(orientation);
    let length = (2 + EXIF_HEADER.len() + tiff.len()) as u16;
    let mut segment = Vec::with_capacity(2 + length as usize);
    segment.extend_from_slice(&[0xFF, MARKER_APP1]);
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(&tiff);
    segment
}

/// Location of the IFD0 orientation value inside a TIFF block
struct OrientationEntry {
    /// Offset of the SHORT value relative to the TIFF header
    value_offset: usize,
    big_endian: bool,
}

fn locate_orientation_entry(tiff: &[u8]) -> Result<Option<OrientationEntry>, PhotoError> {
    let malformed = |what: &str| PhotoError::MalformedJpeg(format!("bad TIFF block: {}", what));

    let big_endian = match tiff.get(..4) {
        Some([b'M', b'M', 0, 42]) => true,
        Some([b'I', b'I', 42, 0]) => false,
        _ => return Err(malformed("header")),
    };
    let read_u16 = |offset: usize| -> Option<u16> {
        let bytes = [*tiff.get(offset)?, *tiff.get(offset + 1)?];
        Some(if big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    };
    let read_u32 = |offset: usize| -> Option<u32> {
        let bytes = [
            *tiff.get(offset)?,
            *tiff.get(offset + 1)?,
            *tiff.get(offset + 2)?,
            *tiff.get(offset + 3)?,
        ];
        Some(if big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    };

    let ifd = read_u32(4).ok_or_else(|| malformed("IFD offset"))? as usize;
    let count = read_u16(ifd).ok_or_else(|| malformed("IFD entry count"))?;
    for i in 0..count as usize {
        let entry = ifd + 2 + i * 12;
        let tag = read_u16(entry).ok_or_else(|| malformed("IFD entry"))?;
        if tag != TAG_ORIENTATION {
            continue;
        }
        let kind = read_u16(entry + 2).ok_or_else(|| malformed("IFD entry"))?;
        let values = read_u32(entry + 4).ok_or_else(|| malformed("IFD entry"))?;
        if kind != TYPE_SHORT || values != 1 || entry + 10 > tiff.len() {
            return Err(malformed("orientation entry is not a single SHORT"));
        }
        return Ok(Some(OrientationEntry {
            value_offset: entry + 8,
            big_endian,
        }));
    }
    Ok(None)
}

/// Return a copy of `jpeg` tagged with `orientation`
///
/// An existing Exif block keeps all of its other tags. Fails with
/// [`PhotoError::MissingOrientationEntry`] when that block has no
/// orientation entry to update.
pub fn set_orientation(jpeg: &[u8], orientation: ExifOrientation) -> Result<Vec<u8>, PhotoError> {
    let segments = header_segments(jpeg)?;

    if let Some(exif) = segments.iter().find(|s| s.is_exif(jpeg)) {
        let tiff_start = exif.tiff_start();
        let entry = locate_orientation_entry(&jpeg[tiff_start..exif.end])?
            .ok_or(PhotoError::MissingOrientationEntry)?;

        let code = orientation.code();
        let value = if entry.big_endian {
            code.to_be_bytes()
        } else {
            code.to_le_bytes()
        };
        let mut output = jpeg.to_vec();
        let at = tiff_start + entry.value_offset;
        output[at..at + 2].copy_from_slice(&value);

        debug!(code, "Updated EXIF orientation in place");
        return Ok(output);
    }

    // Exif belongs right after SOI, or after a leading JFIF APP0
    let insert_at = match segments.first() {
        Some(first) if first.marker == MARKER_APP0 => first.end,
        _ => 2,
    };
    let app1 = orientation_segment(orientation);
    let mut output = Vec::with_capacity(jpeg.len() + app1.len());
    output.extend_from_slice(&jpeg[..insert_at]);
    output.extend_from_slice(&app1);
    output.extend_from_slice(&jpeg[insert_at..]);

    debug!(
        code = orientation.code(),
        bytes = output.len(),
        "Inserted EXIF orientation"
    );
    Ok(output)
}

/// Read the orientation tag from `jpeg`
///
/// Returns `Ok(None)` when there is no Exif block, no orientation entry, or
/// the entry holds a mirrored code.
pub fn read_orientation(jpeg: &[u8]) -> Result<Option<ExifOrientation>, PhotoError> {
    let segments = header_segments(jpeg)?;
    let Some(exif) = segments.iter().find(|s| s.is_exif(jpeg)) else {
        return Ok(None);
    };
    Ok(Orientation::from_exif_chunk(&jpeg[exif.tiff_start()..exif.end])
        .and_then(|o| ExifOrientation::from_code(o.to_exif().into())))
}

/// Little-endian Exif block with Make = "Cam" and the given orientation
#[cfg(test)]
pub(crate) fn camera_exif_jpeg(code: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    // Make, ASCII "Cam\0" inline
    tiff.extend_from_slice(&0x010Fu16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&4u32.to_le_bytes());
    tiff.extend_from_slice(b"Cam\0");
    // Orientation
    tiff.extend_from_slice(&TAG_ORIENTATION.to_le_bytes());
    tiff.extend_from_slice(&TYPE_SHORT.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&code.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, MARKER_APP1];
    jpeg.extend_from_slice(&((2 + EXIF_HEADER.len() + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(EXIF_HEADER);
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0x12, 0x34, 0xFF, 0xD9]);
    jpeg
}
