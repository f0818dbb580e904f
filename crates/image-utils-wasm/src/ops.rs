//! The four image operations for JavaScript.
//!
//! Every function takes the encoded image as a `Uint8Array` and returns the
//! re-encoded JPEG, or `undefined` if the image could not be decoded, the
//! geometry leaves nothing to encode, or encoding failed. The reason is
//! logged to the console at `warn`.
//!
//! # Example
//!
//! ```typescript
//! import { crop, resize_to_max } from '@image-utils/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const thumb = resize_to_max(bytes, 256, 80);
//! if (thumb === undefined) {
//!   console.error('not an image');
//! }
//! ```

use image_utils_core::{execute, ImageCodec, ImageOp};
use wasm_bindgen::prelude::*;

fn run(bytes: &[u8], op: ImageOp) -> Option<Vec<u8>> {
    match execute(&ImageCodec::default(), bytes, &op) {
        Ok(jpeg) => Some(jpeg),
        Err(e) => {
            log::warn!("{} failed: {}", op.name(), e);
            None
        }
    }
}

/// Crop a rectangle given in displayed (EXIF-corrected) coordinates.
///
/// # Arguments
///
/// * `bytes` - Encoded image
/// * `x`, `y` - Top-left corner of the rectangle
/// * `width`, `height` - Rectangle size; parts outside the image are dropped
/// * `quality` - JPEG quality, clamped to 0-100
#[wasm_bindgen]
pub fn crop(bytes: &[u8], x: i32, y: i32, width: i32, height: i32, quality: i32) -> Option<Vec<u8>> {
    run(bytes, ImageOp::crop(x, y, width, height, quality))
}

/// Rotate clockwise by `angle` degrees. Any integer angle is accepted.
#[wasm_bindgen]
pub fn rotate(bytes: &[u8], angle: i32, quality: i32) -> Option<Vec<u8>> {
    run(bytes, ImageOp::rotate(angle, quality))
}

/// Scale to fit within `dest_width x dest_height`, keeping the aspect ratio.
#[wasm_bindgen]
pub fn resize(bytes: &[u8], dest_width: i32, dest_height: i32, quality: i32) -> Option<Vec<u8>> {
    run(bytes, ImageOp::resize(dest_width, dest_height, quality))
}

/// Scale so the longer displayed side is `max_size` pixels.
#[wasm_bindgen]
pub fn resize_to_max(bytes: &[u8], max_size: i32, quality: i32) -> Option<Vec<u8>> {
    run(bytes, ImageOp::resize_to_max(max_size, quality))
}
