//! Transform planning for the four supported operations.
//!
//! Each planner takes the raw raster size, the EXIF rotation and the
//! caller's display-space parameters, and returns the exact raw-space
//! instructions for a codec. Host values arrive as signed integers and are
//! widened to `i64` so no combination of inputs can overflow.

use serde::{Deserialize, Serialize};

use super::{fit_to_max, fit_within, rotated_bounds, Rect, Rotation, Size};
use crate::error::OpError;

/// Backend-agnostic instructions for one operation.
///
/// Codecs apply the steps to the raw raster in this order: crop to
/// `source_rect`, scale to `dest_size` (if any), rotate clockwise by
/// `rotate_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformPlan {
    /// Region of the raw raster to keep.
    pub source_rect: Rect,
    /// Size to scale the kept region to, in raw space.
    pub dest_size: Option<Size>,
    /// Clockwise rotation in degrees, in [0, 360).
    pub rotate_by: u32,
    /// Size of the raster that reaches the encoder.
    pub output_size: Size,
}

impl TransformPlan {
    /// True if executing this plan leaves a `container`-sized raster untouched.
    pub fn is_identity(&self, container: Size) -> bool {
        self.source_rect.covers(container)
            && self.dest_size.map_or(true, |size| size == container)
            && self.rotate_by == 0
    }
}

/// Plan a crop requested in display space.
///
/// The display-space rectangle is mapped back into raw space by the inverse
/// of `rotation`, then clamped to the raster. Overlap with the raster edge
/// shrinks the rectangle; a rectangle with nothing left is an error. The
/// cropped region is rotated by `rotation` afterwards so that only the kept
/// pixels are turned.
///
/// # Errors
///
/// Returns `OpError::DegenerateGeometry` if the clamped rectangle has zero
/// width or height.
///
/// # Example
///
/// ```
/// use image_utils_core::geometry::{plan_crop, Rect, Rotation, Size};
///
/// // A 500x1000 raw raster shown as 1000x500 after a 90 degree correction
/// let plan = plan_crop(Size::new(500, 1000), Rotation::Cw90, 0, 0, 500, 500).unwrap();
/// assert_eq!(plan.source_rect, Rect::new(0, 500, 500, 500));
/// ```
pub fn plan_crop(
    container: Size,
    rotation: Rotation,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
) -> Result<TransformPlan, OpError> {
    let sw = i64::from(container.width);
    let sh = i64::from(container.height);

    let (dx, dy, dw, dh) = match rotation {
        Rotation::None => (x, y, width, height),
        Rotation::Cw90 => (y, sh.saturating_sub(x).saturating_sub(width), height, width),
        Rotation::Cw180 => (
            sw.saturating_sub(x).saturating_sub(width),
            sh.saturating_sub(y).saturating_sub(height),
            width,
            height,
        ),
        Rotation::Cw270 => (sw.saturating_sub(y).saturating_sub(height), x, height, width),
    };

    // Backends cannot address pixels outside the raster
    let dx = dx.clamp(0, sw);
    let dy = dy.clamp(0, sh);
    let dw = dw.clamp(0, sw - dx);
    let dh = dh.clamp(0, sh - dy);

    if dw == 0 || dh == 0 {
        return Err(OpError::DegenerateGeometry {
            width: dw,
            height: dh,
        });
    }

    // All four values lie in [0, u32::MAX] after clamping to the container
    let source_rect = Rect::new(dx as u32, dy as u32, dw as u32, dh as u32);

    Ok(TransformPlan {
        source_rect,
        dest_size: None,
        rotate_by: rotation.degrees(),
        output_size: source_rect.size().oriented(rotation),
    })
}

/// Plan a rotation by an arbitrary number of clockwise degrees.
///
/// The requested angle and the EXIF correction are combined modulo 360. An
/// effective angle of zero is the identity; anything else rotates onto a
/// canvas that bounds the rotated raster.
pub fn plan_rotate(container: Size, rotation: Rotation, angle: i64) -> TransformPlan {
    let effective = angle
        .rem_euclid(360)
        .saturating_add(i64::from(rotation.degrees()))
        .rem_euclid(360) as u32;

    TransformPlan {
        source_rect: Rect::full(container),
        dest_size: None,
        rotate_by: effective,
        output_size: rotated_bounds(container, effective),
    }
}

/// Plan a fit-within resize to a display-space box.
///
/// The source is scaled uniformly by the smaller of the two axis ratios so
/// the displayed result fits inside `dest_width x dest_height`, then rotated
/// by `rotation`.
///
/// # Errors
///
/// Returns `OpError::DegenerateGeometry` if either box side is not positive.
pub fn plan_resize(
    container: Size,
    rotation: Rotation,
    dest_width: i64,
    dest_height: i64,
) -> Result<TransformPlan, OpError> {
    if dest_width <= 0 || dest_height <= 0 {
        return Err(OpError::DegenerateGeometry {
            width: dest_width,
            height: dest_height,
        });
    }

    let display = container.oriented(rotation);
    let fitted = fit_within(display, saturate_u32(dest_width), saturate_u32(dest_height));

    Ok(scale_plan(container, rotation, fitted))
}

/// Plan a resize that maps the longer side to `max_size`.
///
/// # Errors
///
/// Returns `OpError::DegenerateGeometry` if `max_size` is not positive.
pub fn plan_resize_to_max(
    container: Size,
    rotation: Rotation,
    max_size: i64,
) -> Result<TransformPlan, OpError> {
    if max_size <= 0 {
        return Err(OpError::DegenerateGeometry {
            width: max_size,
            height: max_size,
        });
    }

    let display = container.oriented(rotation);
    let fitted = fit_to_max(display, saturate_u32(max_size));

    Ok(scale_plan(container, rotation, fitted))
}

/// Shared scale-then-rotate step of both resize operations.
fn scale_plan(container: Size, rotation: Rotation, display_size: Size) -> TransformPlan {
    TransformPlan {
        source_rect: Rect::full(container),
        dest_size: Some(display_size.oriented(rotation)),
        rotate_by: rotation.degrees(),
        output_size: display_size,
    }
}

fn saturate_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
