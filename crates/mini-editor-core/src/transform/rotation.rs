//! Image rotation with canvas expansion.
//!
//! Exact quarter turns (90°, 180°, 270°) are lossless pixel transposes.
//! Any other angle uses inverse mapping: for each pixel in the output
//! image, we calculate where it lands in the source and interpolate.
//!
//! For rotation by angle θ (counter-clockwise, y axis pointing down), the
//! inverse transform about the centers is:
//! ```text
//! src_x = dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y = dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! Samples are taken at pixel centers and interpolated in premultiplied
//! alpha, so the transparent fill outside the source never darkens edges.

use image::imageops::FilterType;

use crate::decode::{DecodedImage, CHANNELS};

/// Angles closer than this to a special value are treated as that value.
const ANGLE_EPSILON: f64 = 0.001;

/// Resampling kernel of the rotate stage: bicubic Catmull-Rom over the
/// 4x4 neighborhood, as implemented by [`cubic_weight`].
pub const ROTATE_FILTER: FilterType = FilterType::CatmullRom;

/// Rotation normalized to a number of counter-clockwise quarter turns, if exact.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    [0.0, 90.0, 180.0, 270.0, 360.0]
        .iter()
        .position(|q| (normalized - q).abs() < ANGLE_EPSILON)
        .map(|i| (i % 4) as u8)
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// When an image is rotated, the corners extend beyond the original bounds.
/// This function calculates the minimum pixel canvas that contains the
/// entire rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
///
/// # Example
///
/// ```
/// use mini_editor_core::transform::compute_rotated_bounds;
///
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
///
/// // No rotation preserves dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    // Fast path: quarter turns either keep or swap dimensions
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 0 {
            (width, height)
        } else {
            (height, width)
        };
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    // Rounded up so no corner is clipped; the tolerance absorbs float noise.
    let new_w = (w * cos + h * sin - 1e-6).ceil() as u32;
    let new_h = (w * sin + h * cos - 1e-6).ceil() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Apply rotation to an image.
///
/// The image is rotated around its center. The output canvas is expanded
/// to fit the entire rotated image (no clipping); uncovered canvas is
/// fully transparent.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// New `DecodedImage` with the rotated content. The dimensions may differ
/// from the source due to canvas expansion.
pub fn apply_rotation(image: &DecodedImage, angle_degrees: f64) -> DecodedImage {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return rotate_quarter_turns(image, turns);
    }

    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Centers in continuous coordinates (pixel i covers [i, i + 1))
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = DecodedImage::transparent(dst_w, dst_h);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Translate destination pixel center to origin at canvas center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Inverse rotation, then back to source pixel-index space
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = sample_bicubic(image, src_x, src_y);

            let dst_idx = output.index_of(dst_x, dst_y);
            output.pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    output
}

/// Rotate by `turns` counter-clockwise quarter turns without resampling.
fn rotate_quarter_turns(image: &DecodedImage, turns: u8) -> DecodedImage {
    let (w, h) = (image.width, image.height);
    if turns == 0 {
        return image.clone();
    }

    let (dst_w, dst_h) = if turns % 2 == 0 { (w, h) } else { (h, w) };
    let mut output = DecodedImage::transparent(dst_w, dst_h);

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match turns {
                1 => (y, w - 1 - x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (h - 1 - y, x),
            };
            let src_idx = image.index_of(x, y);
            let dst_idx = output.index_of(dx, dy);
            output.pixels[dst_idx..dst_idx + CHANNELS]
                .copy_from_slice(&image.pixels[src_idx..src_idx + CHANNELS]);
        }
    }

    output
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Accumulate a weighted tap in premultiplied form.
#[inline]
fn accumulate(acc: &mut [f64; 4], pixel: [f64; 4], weight: f64) {
    let a = pixel[3] * weight;
    acc[0] += pixel[0] * a;
    acc[1] += pixel[1] * a;
    acc[2] += pixel[2] * a;
    acc[3] += a;
}

/// Convert a premultiplied accumulator back to straight RGBA8.
#[inline]
fn unpremultiply(acc: [f64; 4]) -> [u8; 4] {
    let alpha = acc[3].clamp(0.0, 255.0).round();
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut result = [0u8; 4];
    for i in 0..3 {
        result[i] = (acc[i] / acc[3]).clamp(0.0, 255.0).round() as u8;
    }
    result[3] = alpha as u8;
    result
}

/// Sample a pixel using bicubic interpolation.
///
/// Considers the 4x4 neighborhood around the sample point. Taps outside
/// the source count as transparent.
fn sample_bicubic(image: &DecodedImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    // Beyond kernel reach of every source pixel
    if x <= -2.0 || y <= -2.0 || x >= (w + 1) as f64 || y >= (h + 1) as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut acc = [0.0f64; 4];
    for ky in -1..=2 {
        let py = y0 + ky;
        if py < 0 || py >= h {
            continue;
        }
        let wy = cubic_weight(y - py as f64);
        for kx in -1..=2 {
            let px = x0 + kx;
            if px < 0 || px >= w {
                continue;
            }
            let weight = cubic_weight(x - px as f64) * wy;
            accumulate(&mut acc, get_pixel_f64(image, px as usize, py as usize), weight);
        }
    }

    unpremultiply(acc)
}

/// Catmull-Rom cubic convolution kernel (a = -0.5).
///
/// ```text
/// W(x) = (a+2)|x|³ - (a+3)|x|² + 1        for |x| <= 1
/// W(x) = a|x|³ - 5a|x|² + 8a|x| - 4a      for 1 < |x| < 2
/// W(x) = 0                                otherwise
/// ```
fn cubic_weight(x: f64) -> f64 {
    const A: f64 = -0.5;
    let x = x.abs();
    if x <= 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
    } else {
        0.0
    }
}
