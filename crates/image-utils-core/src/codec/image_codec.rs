//! Codec backend built on the `image` crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, Limits};

use super::rotate::rotate_arbitrary;
use super::{Codec, Raster};
use crate::config::CodecConfig;
use crate::error::OpError;
use crate::geometry::{rotated_bounds, Rect, Rotation, Size};

/// Decodes anything the `image` crate's enabled formats accept, and always
/// encodes JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec {
    config: CodecConfig,
}

impl ImageCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Reject rasters whose RGB buffer would exceed `max_alloc`.
    fn check_alloc(&self, size: Size) -> Result<(), OpError> {
        let bytes = u64::from(size.width)
            .saturating_mul(u64::from(size.height))
            .saturating_mul(3);
        if bytes > self.config.max_alloc {
            return Err(OpError::TooLarge {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }
}

impl Codec for ImageCodec {
    type Raster = Raster;

    /// Decode image bytes to RGB8. EXIF orientation is deliberately left
    /// unapplied; the geometry engine accounts for it.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, OpError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| OpError::Decode(e.to_string()))?;

        let mut limits = Limits::default();
        limits.max_alloc = Some(self.config.max_alloc);
        reader.limits(limits);

        let img = reader.decode().map_err(|e| OpError::Decode(e.to_string()))?;

        Ok(Raster::from_rgb_image(img.into_rgb8()))
    }

    fn size(&self, raster: &Raster) -> Size {
        raster.size()
    }

    fn crop(&self, raster: Raster, rect: Rect) -> Result<Raster, OpError> {
        if rect.covers(raster.size()) {
            return Ok(raster);
        }

        let right = u64::from(rect.x) + u64::from(rect.width);
        let bottom = u64::from(rect.y) + u64::from(rect.height);
        if rect.width == 0
            || rect.height == 0
            || right > u64::from(raster.width)
            || bottom > u64::from(raster.height)
        {
            return Err(OpError::DegenerateGeometry {
                width: i64::from(rect.width),
                height: i64::from(rect.height),
            });
        }

        let src_stride = raster.width as usize * 3;
        let row_len = rect.width as usize * 3;
        let mut output = Vec::with_capacity(row_len * rect.height as usize);

        // Copy pixel data row by row
        for y in rect.y..rect.y + rect.height {
            let start = y as usize * src_stride + rect.x as usize * 3;
            output.extend_from_slice(&raster.pixels[start..start + row_len]);
        }

        Ok(Raster::new(rect.width, rect.height, output))
    }

    fn scale(&self, raster: Raster, size: Size) -> Result<Raster, OpError> {
        if size.is_empty() {
            return Err(OpError::DegenerateGeometry {
                width: i64::from(size.width),
                height: i64::from(size.height),
            });
        }

        if raster.size() == size {
            return Ok(raster);
        }
        self.check_alloc(size)?;

        let rgb_image = into_rgb_image(raster)?;
        let resized = image::imageops::resize(
            &rgb_image,
            size.width,
            size.height,
            self.config.resize_filter.to_image_filter(),
        );

        Ok(Raster::from_rgb_image(resized))
    }

    fn rotate(&self, raster: Raster, degrees: u32) -> Result<Raster, OpError> {
        let degrees = degrees % 360;

        let rotated = match Rotation::from_degrees(i64::from(degrees)) {
            Some(Rotation::None) => return Ok(raster),
            Some(Rotation::Cw90) => image::imageops::rotate90(&into_rgb_image(raster)?),
            Some(Rotation::Cw180) => image::imageops::rotate180(&into_rgb_image(raster)?),
            Some(Rotation::Cw270) => image::imageops::rotate270(&into_rgb_image(raster)?),
            None => {
                self.check_alloc(rotated_bounds(raster.size(), degrees))?;
                return Ok(rotate_arbitrary(&raster, degrees, self.config.rotate_filter));
            }
        };

        Ok(Raster::from_rgb_image(rotated))
    }

    /// Encode to JPEG.
    ///
    /// The JPEG encoder accepts qualities 1-100, so 0 is encoded as 1.
    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>, OpError> {
        if raster.is_empty() {
            return Err(OpError::Encode(format!(
                "Invalid dimensions: width ({}) and height ({}) must be non-zero",
                raster.width, raster.height
            )));
        }

        let expected_len = raster.width as usize * raster.height as usize * 3;
        if raster.pixels.len() != expected_len {
            return Err(OpError::Encode(format!(
                "Invalid pixel data: expected {} bytes, got {}",
                expected_len,
                raster.pixels.len()
            )));
        }

        let quality = quality.clamp(1, 100);

        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

        encoder
            .write_image(
                &raster.pixels,
                raster.width,
                raster.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| OpError::Encode(e.to_string()))?;

        let bytes = buffer.into_inner();
        if bytes.is_empty() {
            return Err(OpError::Encode("encoder produced no output".to_string()));
        }

        Ok(bytes)
    }
}

fn into_rgb_image(raster: Raster) -> Result<image::RgbImage, OpError> {
    let (width, height, len) = (raster.width, raster.height, raster.pixels.len());
    raster.into_rgb_image().ok_or_else(|| {
        OpError::Decode(format!(
            "Pixel buffer of {} bytes does not match {}x{} RGB",
            len, width, height
        ))
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
