//! Tunables for the codec backend and the call dispatcher.
//!
//! Both structs are plain data with sensible defaults, so hosts can build
//! them in code or deserialize them from whatever settings format they use.

use serde::{Deserialize, Serialize};

/// Filter type for raster scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Interpolation filter for rotations that are not a multiple of 90 degrees.
///
/// Right-angle rotations are exact pixel moves and ignore this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation over a 6x6 neighborhood.
    Lanczos3,
}

/// Largest pixel buffer a codec step may allocate, in bytes.
///
/// Matches the `image` crate's default decoder allocation limit.
pub const DEFAULT_MAX_ALLOC: u64 = 512 * 1024 * 1024;

/// Settings for [`ImageCodec`](crate::codec::ImageCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Filter used by resize and resize-to-max.
    pub resize_filter: FilterType,
    /// Filter used by arbitrary-angle rotation.
    pub rotate_filter: InterpolationFilter,
    /// Allocation cap for decoded and transformed rasters.
    pub max_alloc: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            resize_filter: FilterType::default(),
            rotate_filter: InterpolationFilter::default(),
            max_alloc: DEFAULT_MAX_ALLOC,
        }
    }
}

/// Number of workers a [`CallHandler`](crate::handler::CallHandler) starts with by default.
pub const DEFAULT_WORKERS: usize = 5;

/// Settings for the method-call dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Size of the worker pool. Zero lets rayon pick one thread per core.
    pub workers: usize,
    /// Codec settings shared by every call.
    pub codec: CodecConfig,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            codec: CodecConfig::default(),
        }
    }
}
