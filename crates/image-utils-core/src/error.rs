//! Error types for image operations and method calls.

use thiserror::Error;

/// Errors an image operation can fail with.
///
/// Every variant is surfaced to hosts as an absent result; none of them is
/// transient, so callers never retry.
#[derive(Debug, Error)]
pub enum OpError {
    /// The input bytes are not a decodable image.
    #[error("Invalid or unsupported image data: {0}")]
    Decode(String),

    /// A computed rectangle or size has zero or negative area.
    #[error("Degenerate geometry: {width}x{height}")]
    DegenerateGeometry { width: i64, height: i64 },

    /// A step would need a raster larger than the allocation limit.
    #[error("Raster of {width}x{height} exceeds the allocation limit")]
    TooLarge { width: u32, height: u32 },

    /// The encoder could not produce output bytes.
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Errors raised while turning a host method call into an operation.
#[derive(Debug, Error)]
pub enum CallError {
    /// The method name is outside the supported set.
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    /// A required argument is missing or has the wrong type.
    #[error("Invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },
}

/// Errors starting a [`CallHandler`](crate::handler::CallHandler).
#[cfg(feature = "threads")]
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The worker pool could not be built.
    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_error_display() {
        let err = OpError::DegenerateGeometry {
            width: 0,
            height: 20,
        };
        assert_eq!(err.to_string(), "Degenerate geometry: 0x20");

        let err = OpError::TooLarge {
            width: 70000,
            height: 70000,
        };
        assert_eq!(
            err.to_string(),
            "Raster of 70000x70000 exceeds the allocation limit"
        );

        let err = OpError::Decode("bad header".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid or unsupported image data: bad header"
        );
    }

    #[test]
    fn test_call_error_display() {
        let err = CallError::NotImplemented("flip".to_string());
        assert_eq!(err.to_string(), "Method not implemented: flip");

        let err = CallError::InvalidArguments {
            method: "crop".to_string(),
            reason: "missing field `x`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid arguments for crop: missing field `x`"
        );
    }
}
