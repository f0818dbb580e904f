//! The four image operations, end to end.
//!
//! An operation is decode, read the EXIF rotation, plan, execute the plan
//! and encode. It either yields the complete JPEG or fails; there is no
//! partial output.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec::{execute_plan, Codec};
use crate::error::OpError;
use crate::geometry::{
    plan_crop, plan_resize, plan_resize_to_max, plan_rotate, Rotation, Size, TransformPlan,
};
use crate::orientation::{probe, rotation_degrees};

/// Highest JPEG quality a host can ask for.
pub const MAX_QUALITY: u8 = 100;

/// One operation request with the host's parameters.
///
/// Coordinates and sizes are kept exactly as the host sent them; the
/// geometry engine decides what is valid. Quality is clamped into
/// `[0, 100]` by the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ImageOp {
    /// Keep a display-space rectangle.
    Crop {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        quality: u8,
    },
    /// Rotate clockwise by `angle` degrees.
    Rotate { angle: i32, quality: u8 },
    /// Fit within a display-space box, preserving aspect ratio.
    Resize {
        dest_width: i32,
        dest_height: i32,
        quality: u8,
    },
    /// Scale so the longer display side equals `max_size`.
    ResizeToMax { max_size: i32, quality: u8 },
}

impl ImageOp {
    pub fn crop(x: i32, y: i32, width: i32, height: i32, quality: i32) -> Self {
        ImageOp::Crop {
            x,
            y,
            width,
            height,
            quality: clamp_quality(quality),
        }
    }

    pub fn rotate(angle: i32, quality: i32) -> Self {
        ImageOp::Rotate {
            angle,
            quality: clamp_quality(quality),
        }
    }

    pub fn resize(dest_width: i32, dest_height: i32, quality: i32) -> Self {
        ImageOp::Resize {
            dest_width,
            dest_height,
            quality: clamp_quality(quality),
        }
    }

    pub fn resize_to_max(max_size: i32, quality: i32) -> Self {
        ImageOp::ResizeToMax {
            max_size,
            quality: clamp_quality(quality),
        }
    }

    /// Method name hosts use for this operation.
    pub fn name(&self) -> &'static str {
        match self {
            ImageOp::Crop { .. } => "crop",
            ImageOp::Rotate { .. } => "rotate",
            ImageOp::Resize { .. } => "resize",
            ImageOp::ResizeToMax { .. } => "resizeToMax",
        }
    }

    pub fn quality(&self) -> u8 {
        match *self {
            ImageOp::Crop { quality, .. }
            | ImageOp::Rotate { quality, .. }
            | ImageOp::Resize { quality, .. }
            | ImageOp::ResizeToMax { quality, .. } => quality.min(MAX_QUALITY),
        }
    }

    /// Plan this operation for a raw raster of `container` size.
    ///
    /// # Errors
    ///
    /// Returns `OpError::DegenerateGeometry` if the request leaves nothing
    /// to encode.
    pub fn plan_for(&self, container: Size, rotation: Rotation) -> Result<TransformPlan, OpError> {
        match *self {
            ImageOp::Crop {
                x,
                y,
                width,
                height,
                ..
            } => plan_crop(
                container,
                rotation,
                i64::from(x),
                i64::from(y),
                i64::from(width),
                i64::from(height),
            ),
            ImageOp::Rotate { angle, .. } => Ok(plan_rotate(container, rotation, i64::from(angle))),
            ImageOp::Resize {
                dest_width,
                dest_height,
                ..
            } => plan_resize(
                container,
                rotation,
                i64::from(dest_width),
                i64::from(dest_height),
            ),
            ImageOp::ResizeToMax { max_size, .. } => {
                plan_resize_to_max(container, rotation, i64::from(max_size))
            }
        }
    }
}

/// Clamp a host-supplied quality into `[0, 100]`.
pub fn clamp_quality(quality: i32) -> u8 {
    // The clamp bounds the value to u8 range
    quality.clamp(0, i32::from(MAX_QUALITY)) as u8
}

/// Run `op` on encoded `bytes` and return the re-encoded JPEG.
///
/// # Errors
///
/// Returns `OpError::Decode` for undecodable input,
/// `OpError::DegenerateGeometry` for requests with zero area,
/// `OpError::TooLarge` if a step would exceed the codec's allocation limit
/// and `OpError::Encode` if the encoder produces nothing.
pub fn execute<C: Codec + ?Sized>(
    codec: &C,
    bytes: &[u8],
    op: &ImageOp,
) -> Result<Vec<u8>, OpError> {
    let raster = codec.decode(bytes)?;
    let rotation = rotation_degrees(bytes);
    let container = codec.size(&raster);

    let plan = op.plan_for(container, rotation)?;
    debug!(
        "{}: {}x{} raster, exif {} degrees, plan {:?}",
        op.name(),
        container.width,
        container.height,
        rotation.degrees(),
        plan
    );

    let raster = execute_plan(codec, raster, &plan)?;
    codec.encode(&raster, op.quality())
}

/// Plan `op` for encoded `bytes` from the image header alone.
///
/// # Errors
///
/// Returns `OpError::Decode` if the header cannot be read, or
/// `OpError::DegenerateGeometry` as [`ImageOp::plan_for`] does.
pub fn plan(bytes: &[u8], op: &ImageOp) -> Result<TransformPlan, OpError> {
    let info = probe(bytes)?;
    op.plan_for(info.raw_size(), info.rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{jpeg_bytes, ImageCodec};
    use crate::geometry::Rect;
    use crate::orientation::tests::with_orientation;

    fn output_size(jpeg: &[u8]) -> Size {
        probe(jpeg).unwrap().raw_size()
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(ImageOp::rotate(0, 150).quality(), 100);
        assert_eq!(ImageOp::rotate(0, -5).quality(), 0);
        assert_eq!(ImageOp::crop(0, 0, 1, 1, 75).quality(), 75);
    }

    #[test]
    fn test_names() {
        assert_eq!(ImageOp::crop(0, 0, 1, 1, 90).name(), "crop");
        assert_eq!(ImageOp::rotate(0, 90).name(), "rotate");
        assert_eq!(ImageOp::resize(1, 1, 90).name(), "resize");
        assert_eq!(ImageOp::resize_to_max(1, 90).name(), "resizeToMax");
    }

    #[test]
    fn test_op_serde_shape() {
        let json = serde_json::to_value(ImageOp::resize(200, 100, 80)).unwrap();
        assert_eq!(json["op"], "resize");
        assert_eq!(json["dest_width"], 200);
    }

    #[test]
    fn test_crop_end_to_end() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::crop(4, 4, 20, 10, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(20, 10));
    }

    #[test]
    fn test_crop_respects_exif_rotation() {
        // Raw 40x20, displayed as 20x40
        let bytes = with_orientation(&jpeg_bytes(40, 20), 6);
        let codec = ImageCodec::default();

        let out = execute(&codec, &bytes, &ImageOp::crop(0, 0, 10, 30, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(10, 30));
    }

    #[test]
    fn test_crop_overlapping_edge_shrinks() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::crop(50, 20, 40, 40, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(14, 12));
    }

    #[test]
    fn test_crop_outside_is_degenerate() {
        let codec = ImageCodec::default();
        let result = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::crop(100, 0, 10, 10, 90));
        assert!(matches!(result, Err(OpError::DegenerateGeometry { .. })));

        let result = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::crop(0, 0, -5, 10, 90));
        assert!(matches!(result, Err(OpError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_rotate_zero_keeps_dimensions() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::rotate(0, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(64, 32));
    }

    #[test]
    fn test_rotate_adds_exif_rotation() {
        let codec = ImageCodec::default();

        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::rotate(-90, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(32, 64));

        // 270 + 90 is a full turn
        let bytes = with_orientation(&jpeg_bytes(64, 32), 6);
        let out = execute(&codec, &bytes, &ImageOp::rotate(270, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(64, 32));
    }

    #[test]
    fn test_resize_fits_box() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::resize(32, 32, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(32, 16));
    }

    #[test]
    fn test_resize_box_is_display_space() {
        // Raw 64x32, displayed as 32x64
        let bytes = with_orientation(&jpeg_bytes(64, 32), 8);
        let codec = ImageCodec::default();

        let out = execute(&codec, &bytes, &ImageOp::resize(16, 64, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(16, 32));
    }

    #[test]
    fn test_resize_to_max() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(64, 32), &ImageOp::resize_to_max(16, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(16, 8));
    }

    #[test]
    fn test_resize_to_max_upscales() {
        let codec = ImageCodec::default();
        let out = execute(&codec, &jpeg_bytes(20, 10), &ImageOp::resize_to_max(40, 90)).unwrap();
        assert_eq!(output_size(&out), Size::new(40, 20));
    }

    #[test]
    fn test_non_positive_sizes_are_degenerate() {
        let codec = ImageCodec::default();
        let bytes = jpeg_bytes(16, 16);

        for op in [
            ImageOp::resize(0, 10, 90),
            ImageOp::resize(10, -1, 90),
            ImageOp::resize_to_max(0, 90),
        ] {
            let result = execute(&codec, &bytes, &op);
            assert!(
                matches!(result, Err(OpError::DegenerateGeometry { .. })),
                "{:?} should be degenerate",
                op
            );
        }
    }

    #[test]
    fn test_oversized_targets_are_errors() {
        let codec = ImageCodec::default();

        let result = execute(&codec, &jpeg_bytes(8, 8), &ImageOp::resize_to_max(i32::MAX, 90));
        assert!(matches!(result, Err(OpError::TooLarge { .. })));

        let result = execute(
            &codec,
            &jpeg_bytes(8, 4),
            &ImageOp::resize(i32::MAX, i32::MAX, 90),
        );
        assert!(matches!(result, Err(OpError::TooLarge { .. })));
    }

    #[test]
    fn test_undecodable_input() {
        let codec = ImageCodec::default();
        let result = execute(&codec, b"not an image", &ImageOp::rotate(0, 90));
        assert!(matches!(result, Err(OpError::Decode(_))));
    }

    #[test]
    fn test_plan_from_header() {
        let bytes = with_orientation(&jpeg_bytes(500, 1000), 6);
        let plan = plan(&bytes, &ImageOp::crop(0, 0, 500, 500, 90)).unwrap();

        assert_eq!(plan.source_rect, Rect::new(0, 500, 500, 500));
        assert_eq!(plan.rotate_by, 90);
    }

    #[test]
    fn test_plan_matches_executed_output() {
        let bytes = with_orientation(&jpeg_bytes(48, 30), 3);
        let op = ImageOp::resize(20, 20, 80);

        let planned = plan(&bytes, &op).unwrap();
        let out = execute(&ImageCodec::default(), &bytes, &op).unwrap();
        assert_eq!(output_size(&out), planned.output_size);
    }
}
