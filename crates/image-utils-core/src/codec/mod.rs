//! Codec adapters: decode, transform and encode rasters.
//!
//! The geometry engine never touches pixels. It hands a [`TransformPlan`]
//! to a [`Codec`], which owns the raster for the duration of one call and
//! applies the plan as crop, then scale, then rotate.
//!
//! [`ImageCodec`] is the backend built on the `image` crate. Tests use
//! lightweight codecs whose rasters are just sizes.

mod image_codec;
mod raster;
mod rotate;

pub use image_codec::ImageCodec;
pub use raster::Raster;

#[cfg(test)]
pub(crate) use image_codec::tests::jpeg_bytes;

use crate::error::OpError;
use crate::geometry::{Rect, Size, TransformPlan};

/// Capability set a bitmap backend must provide.
pub trait Codec {
    /// The backend's decoded pixel representation.
    type Raster;

    /// Decode encoded bytes into a raw raster, without orientation correction.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Raster, OpError>;

    /// Dimensions of a raster.
    fn size(&self, raster: &Self::Raster) -> Size;

    /// Keep only `rect`, which must lie inside the raster.
    fn crop(&self, raster: Self::Raster, rect: Rect) -> Result<Self::Raster, OpError>;

    /// Scale to exactly `size`.
    fn scale(&self, raster: Self::Raster, size: Size) -> Result<Self::Raster, OpError>;

    /// Rotate clockwise by `degrees` in [0, 360).
    fn rotate(&self, raster: Self::Raster, degrees: u32) -> Result<Self::Raster, OpError>;

    /// Encode as JPEG at `quality` (0 = worst, 100 = best).
    fn encode(&self, raster: &Self::Raster, quality: u8) -> Result<Vec<u8>, OpError>;
}

/// Apply a plan to a raw raster: crop, then scale, then rotate.
///
/// Steps that would not change the raster are skipped, so an identity plan
/// hands the decoded raster straight back.
pub fn execute_plan<C: Codec + ?Sized>(
    codec: &C,
    raster: C::Raster,
    plan: &TransformPlan,
) -> Result<C::Raster, OpError> {
    if plan.is_identity(codec.size(&raster)) {
        return Ok(raster);
    }

    let mut raster = raster;

    if !plan.source_rect.covers(codec.size(&raster)) {
        raster = codec.crop(raster, plan.source_rect)?;
    }

    if let Some(size) = plan.dest_size {
        if size != codec.size(&raster) {
            raster = codec.scale(raster, size)?;
        }
    }

    if plan.rotate_by % 360 != 0 {
        raster = codec.rotate(raster, plan.rotate_by)?;
    }

    Ok(raster)
}
