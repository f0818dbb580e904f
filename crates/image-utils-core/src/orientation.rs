//! EXIF orientation reading.
//!
//! Only the rotation component of the orientation tag is used. Mirrored
//! orientations (2, 4, 5, 7) are treated as their unmirrored rotation.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::OpError;
use crate::geometry::{Rotation, Size};

/// Clockwise rotation needed to display the image upright.
///
/// Returns [`Rotation::None`] if the bytes carry no EXIF data, no
/// orientation tag, or metadata that cannot be parsed.
pub fn rotation_degrees(bytes: &[u8]) -> Rotation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map_or(Rotation::None, rotation_from_exif),
        Err(_) => Rotation::None,
    }
}

/// Map an EXIF orientation value (1-8) to its rotation.
pub fn rotation_from_exif(value: u32) -> Rotation {
    match value {
        3 | 4 => Rotation::Cw180,
        5 | 8 => Rotation::Cw270,
        6 | 7 => Rotation::Cw90,
        _ => Rotation::None,
    }
}

/// Header-level facts about an encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Raw raster width, before orientation correction.
    pub width: u32,
    /// Raw raster height, before orientation correction.
    pub height: u32,
    pub rotation: Rotation,
}

impl ImageInfo {
    /// Raw raster size.
    pub fn raw_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Size as displayed after orientation correction.
    pub fn display_size(&self) -> Size {
        self.raw_size().oriented(self.rotation)
    }
}

/// Read dimensions and rotation without decoding pixel data.
///
/// # Errors
///
/// Returns `OpError::Decode` if the format is not recognized or the header
/// cannot be read.
pub fn probe(bytes: &[u8]) -> Result<ImageInfo, OpError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OpError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| OpError::Decode(e.to_string()))?;

    Ok(ImageInfo {
        width,
        height,
        rotation: rotation_degrees(bytes),
    })
}
