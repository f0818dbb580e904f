//! Arbitrary-angle raster rotation with bilinear and Lanczos3 interpolation.
//!
//! The rotation uses inverse mapping: for each pixel in the output canvas we
//! find the source position it came from and interpolate around it. For a
//! clockwise turn by θ in image coordinates (y pointing down) the inverse is:
//!
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! Canvas pixels that map outside the source are filled with black.

use super::Raster;
use crate::config::InterpolationFilter;
use crate::geometry::rotated_bounds;

/// Rotate a raster clockwise by `angle_degrees` onto its bounding canvas.
pub(crate) fn rotate_arbitrary(
    raster: &Raster,
    angle_degrees: u32,
    filter: InterpolationFilter,
) -> Raster {
    let dst = rotated_bounds(raster.size(), angle_degrees);

    let angle_rad = f64::from(angle_degrees).to_radians();
    let (sin, cos) = angle_rad.sin_cos();

    let src_cx = f64::from(raster.width) / 2.0;
    let src_cy = f64::from(raster.height) / 2.0;
    let dst_cx = f64::from(dst.width) / 2.0;
    let dst_cy = f64::from(dst.height) / 2.0;

    let mut output = vec![0u8; dst.width as usize * dst.height as usize * 3];

    for dst_y in 0..dst.height {
        for dst_x in 0..dst.width {
            // Work with pixel centres so the mapping is symmetric
            let dx = f64::from(dst_x) + 0.5 - dst_cx;
            let dy = f64::from(dst_y) + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(raster, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(raster, src_x, src_y),
            };

            let dst_idx = (dst_y as usize * dst.width as usize + dst_x as usize) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    Raster::new(dst.width, dst.height, output)
}

/// Get a pixel as [f64; 3] from a raster at the given coordinates.
#[inline]
fn get_pixel_f64(raster: &Raster, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * raster.width as usize + px) * 3;
    [
        f64::from(raster.pixels[idx]),
        f64::from(raster.pixels[idx + 1]),
        f64::from(raster.pixels[idx + 2]),
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Positions within half a pixel of the border are clamped onto the edge
/// pixels; anything further out is black.
fn sample_bilinear(raster: &Raster, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (f64::from(raster.width), f64::from(raster.height));

    if x < -0.5 || y < -0.5 || x > w - 0.5 || y > h - 0.5 {
        return [0, 0, 0];
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(raster.width as usize - 1);
    let y1 = (y0 + 1).min(raster.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(raster, x0, y0);
    let p10 = get_pixel_f64(raster, x1, y0);
    let p01 = get_pixel_f64(raster, x0, y1);
    let p11 = get_pixel_f64(raster, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Falls back to bilinear near the edges where the kernel would leave the
/// raster.
fn sample_lanczos3(raster: &Raster, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (i64::from(raster.width), i64::from(raster.height));

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(raster, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(raster, px as usize, py as usize);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, zero elsewhere.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
