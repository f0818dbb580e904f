//! Size arithmetic for rotation canvases and aspect-preserving scaling.

use super::Size;

/// Compute the canvas that exactly bounds a raster rotated by `angle_degrees`.
///
/// The bounding box of a rotated `w x h` rectangle is
/// `|w*cos| + |h*sin|` by `|w*sin| + |h*cos|`, floored to whole pixels.
/// Right angles take an exact path so 90 and 270 swap the sides without
/// floating-point drift.
///
/// # Example
///
/// ```
/// use image_utils_core::geometry::{rotated_bounds, Size};
///
/// assert_eq!(rotated_bounds(Size::new(100, 50), 90), Size::new(50, 100));
/// assert_eq!(rotated_bounds(Size::new(100, 100), 45), Size::new(141, 141));
/// ```
pub fn rotated_bounds(size: Size, angle_degrees: u32) -> Size {
    match angle_degrees % 360 {
        0 | 180 => return size,
        90 | 270 => return size.swapped(),
        _ => {}
    }

    let angle_rad = f64::from(angle_degrees).to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = f64::from(size.width);
    let h = f64::from(size.height);

    let new_w = (w * cos + h * sin).floor() as u32;
    let new_h = (w * sin + h * cos).floor() as u32;

    Size::new(new_w.max(1), new_h.max(1))
}

/// Scale `src` uniformly so it fits inside `max_width x max_height`.
///
/// The smaller of the two axis ratios wins, so neither side leaves the
/// box. Sides are rounded and never drop below one pixel. Upscaling is
/// allowed when the box is larger than the source.
pub fn fit_within(src: Size, max_width: u32, max_height: u32) -> Size {
    if src.is_empty() || max_width == 0 || max_height == 0 {
        return Size::new(0, 0);
    }

    let width_ratio = f64::from(max_width) / f64::from(src.width);
    let height_ratio = f64::from(max_height) / f64::from(src.height);
    let ratio = width_ratio.min(height_ratio);

    let width = (f64::from(src.width) * ratio).round() as u32;
    let height = (f64::from(src.height) * ratio).round() as u32;

    Size::new(width.clamp(1, max_width), height.clamp(1, max_height))
}

/// Scale `src` so its longer side becomes exactly `max_edge`.
///
/// The shorter side is `round(shorter * max_edge / longer)`, computed in
/// integers so the result does not depend on float rounding. Square
/// sources become `max_edge x max_edge`.
pub fn fit_to_max(src: Size, max_edge: u32) -> Size {
    if src.is_empty() || max_edge == 0 {
        return Size::new(0, 0);
    }

    if src.width > src.height {
        Size::new(max_edge, scale_side(src.height, max_edge, src.width))
    } else if src.height > src.width {
        Size::new(scale_side(src.width, max_edge, src.height), max_edge)
    } else {
        Size::new(max_edge, max_edge)
    }
}

/// `round(side * numerator / denominator)`, at least 1.
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    let side = u64::from(side);
    let numerator = u64::from(numerator);
    let denominator = u64::from(denominator);
    let scaled = (2 * side * numerator + denominator) / (2 * denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rotation_bounds() {
        assert_eq!(rotated_bounds(Size::new(100, 50), 0), Size::new(100, 50));
        assert_eq!(rotated_bounds(Size::new(100, 50), 360), Size::new(100, 50));
    }

    #[test]
    fn test_right_angle_bounds() {
        assert_eq!(rotated_bounds(Size::new(100, 50), 90), Size::new(50, 100));
        assert_eq!(rotated_bounds(Size::new(100, 50), 180), Size::new(100, 50));
        assert_eq!(rotated_bounds(Size::new(100, 50), 270), Size::new(50, 100));
        assert_eq!(rotated_bounds(Size::new(100, 50), 450), Size::new(50, 100));
    }

    #[test]
    fn test_45_degree_bounds_are_floored() {
        // Diagonal of 100x100 square is ~141.42
        assert_eq!(rotated_bounds(Size::new(100, 100), 45), Size::new(141, 141));
    }

    #[test]
    fn test_30_degree_bounds() {
        // 100*cos30 + 50*sin30 = 111.60, 100*sin30 + 50*cos30 = 93.30
        assert_eq!(rotated_bounds(Size::new(100, 50), 30), Size::new(111, 93));
    }

    #[test]
    fn test_complementary_angle_bounds() {
        // 30 and 330 are mirror images and share a bounding box
        assert_eq!(
            rotated_bounds(Size::new(100, 50), 30),
            rotated_bounds(Size::new(100, 50), 330)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1, 15, 45, 89, 91, 135, 179, 181, 269, 359] {
            let size = rotated_bounds(Size::new(1, 1), angle);
            assert!(size.width > 0, "Width should be > 0 for angle {}", angle);
            assert!(size.height > 0, "Height should be > 0 for angle {}", angle);
        }
    }

    #[test]
    fn test_fit_within_landscape_box() {
        // 6000x4000 into 1000x1000: width ratio wins
        assert_eq!(fit_within(Size::new(6000, 4000), 1000, 1000), Size::new(1000, 667));
    }

    #[test]
    fn test_fit_within_portrait_box() {
        // 4000x6000 into 1000x500: height ratio wins
        assert_eq!(fit_within(Size::new(4000, 6000), 1000, 500), Size::new(333, 500));
    }

    #[test]
    fn test_fit_within_upscales() {
        assert_eq!(fit_within(Size::new(100, 50), 400, 400), Size::new(400, 200));
    }

    #[test]
    fn test_fit_within_thin_source_keeps_one_pixel() {
        assert_eq!(fit_within(Size::new(10000, 1), 100, 100), Size::new(100, 1));
    }

    #[test]
    fn test_fit_within_zero_input() {
        assert_eq!(fit_within(Size::new(0, 0), 100, 100), Size::new(0, 0));
        assert_eq!(fit_within(Size::new(10, 10), 0, 100), Size::new(0, 0));
    }

    #[test]
    fn test_fit_to_max_landscape() {
        assert_eq!(fit_to_max(Size::new(6000, 4000), 2560), Size::new(2560, 1707));
    }

    #[test]
    fn test_fit_to_max_portrait() {
        assert_eq!(fit_to_max(Size::new(4000, 6000), 2560), Size::new(1707, 2560));
    }

    #[test]
    fn test_fit_to_max_square() {
        assert_eq!(fit_to_max(Size::new(4000, 4000), 256), Size::new(256, 256));
    }

    #[test]
    fn test_fit_to_max_upscales() {
        assert_eq!(fit_to_max(Size::new(100, 50), 1000), Size::new(1000, 500));
    }

    #[test]
    fn test_fit_to_max_rounds_half_up() {
        // 3 * 5 / 2 = 7.5
        assert_eq!(fit_to_max(Size::new(2, 3), 5), Size::new(3, 5));
    }

    #[test]
    fn test_fit_to_max_zero_input() {
        assert_eq!(fit_to_max(Size::new(0, 0), 256), Size::new(0, 0));
        assert_eq!(fit_to_max(Size::new(10, 10), 0), Size::new(0, 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
