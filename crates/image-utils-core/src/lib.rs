//! Image Utils Core - orientation-aware image editing primitives
//!
//! This crate crops, rotates and resizes encoded images and re-encodes the
//! result as JPEG. Requests are expressed in display space, i.e. as the
//! image appears after its EXIF orientation is applied, and the geometry
//! engine maps them onto the raw raster before any pixels are touched.

pub mod codec;
pub mod config;
pub mod error;
pub mod geometry;
pub mod handler;
pub mod ops;
pub mod orientation;

pub use codec::{Codec, ImageCodec, Raster};
pub use config::{CodecConfig, FilterType, HandlerConfig, InterpolationFilter};
pub use error::{CallError, OpError};
pub use geometry::{Rect, Rotation, Size, TransformPlan};
#[cfg(feature = "threads")]
pub use handler::CallHandler;
pub use handler::{respond, MethodCall, Reply};
pub use ops::{execute, ImageOp};
pub use orientation::{probe, rotation_degrees, ImageInfo};

/// Crop a display-space rectangle out of `bytes`.
///
/// Parts of the rectangle outside the image are dropped.
pub fn crop(
    bytes: &[u8],
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    quality: i32,
) -> Result<Vec<u8>, OpError> {
    execute(
        &ImageCodec::default(),
        bytes,
        &ImageOp::crop(x, y, width, height, quality),
    )
}

/// Rotate `bytes` clockwise by `angle` degrees on top of its EXIF rotation.
pub fn rotate(bytes: &[u8], angle: i32, quality: i32) -> Result<Vec<u8>, OpError> {
    execute(&ImageCodec::default(), bytes, &ImageOp::rotate(angle, quality))
}

/// Scale `bytes` to fit within `dest_width x dest_height`.
pub fn resize(
    bytes: &[u8],
    dest_width: i32,
    dest_height: i32,
    quality: i32,
) -> Result<Vec<u8>, OpError> {
    execute(
        &ImageCodec::default(),
        bytes,
        &ImageOp::resize(dest_width, dest_height, quality),
    )
}

/// Scale `bytes` so its longer side is `max_size`.
pub fn resize_to_max(bytes: &[u8], max_size: i32, quality: i32) -> Result<Vec<u8>, OpError> {
    execute(
        &ImageCodec::default(),
        bytes,
        &ImageOp::resize_to_max(max_size, quality),
    )
}
