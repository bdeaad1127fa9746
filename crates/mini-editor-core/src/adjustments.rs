//! Tone, color and filter adjustments applied to RGBA pixel data.
//!
//! ## Enhancement model
//!
//! Brightness, contrast, saturation and sharpness are all "blend toward a
//! degenerate image" operations. For each RGB channel:
//!
//! ```text
//! output = degenerate + factor * (input - degenerate)
//! ```
//!
//! so factor 0 yields the degenerate image, 1 is identity and values above
//! 1 extrapolate away from it. The degenerate images are:
//!
//! | Enhancement | Degenerate |
//! |---|---|
//! | Brightness | black |
//! | Contrast | flat gray at the mean luminance |
//! | Saturation | the pixel's own luminance |
//! | Sharpness | the 3x3 smoothed image |
//!
//! Alpha is never modified by any function in this module except blur,
//! which spreads all four channels, and grayscale, which produces an
//! opaque single-channel image.

use image::imageops;

use crate::decode::{DecodedImage, CHANNELS};
use crate::luminance::{calculate_luminance_u8, mean_luminance};
use crate::transform::TransformError;

/// Smoothing kernel for the sharpness degenerate image.
pub const SMOOTH_KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];

/// Sum of [`SMOOTH_KERNEL`] weights.
const SMOOTH_DIVISOR: f32 = 13.0;

/// Blend one channel value away from (or toward) its degenerate value.
#[inline]
fn blend_channel(degenerate: f32, value: u8, factor: f32) -> u8 {
    let v = degenerate + factor * (value as f32 - degenerate);
    v.clamp(0.0, 255.0).round() as u8
}

/// Scale brightness. Factor 0 is black, 1 is unchanged.
pub fn adjust_brightness(image: &mut DecodedImage, factor: f64) {
    let factor = factor as f32;
    for px in image.pixels.chunks_exact_mut(CHANNELS) {
        for c in &mut px[..3] {
            *c = blend_channel(0.0, *c, factor);
        }
    }
}

/// Scale contrast around the image's mean gray level.
///
/// Factor 0 produces a flat mid-gray (the rounded mean luminance), 1 is
/// unchanged.
pub fn adjust_contrast(image: &mut DecodedImage, factor: f64) {
    let factor = factor as f32;
    let mean = mean_luminance(&image.pixels) as f32;
    for px in image.pixels.chunks_exact_mut(CHANNELS) {
        for c in &mut px[..3] {
            *c = blend_channel(mean, *c, factor);
        }
    }
}

/// Scale color saturation. Factor 0 is fully desaturated, 1 is unchanged.
pub fn adjust_saturation(image: &mut DecodedImage, factor: f64) {
    let factor = factor as f32;
    for px in image.pixels.chunks_exact_mut(CHANNELS) {
        let lum = calculate_luminance_u8(px[0], px[1], px[2]) as f32;
        for c in &mut px[..3] {
            *c = blend_channel(lum, *c, factor);
        }
    }
}

/// Scale sharpness. Factor 0 is the smoothed image, 1 is unchanged and
/// values above 1 sharpen.
///
/// Border pixels are left as they are: the smoothing kernel only covers
/// pixels with a full 3x3 neighborhood.
pub fn adjust_sharpness(image: &mut DecodedImage, factor: f64) {
    let factor = factor as f32;
    let smoothed = smooth_rgb(image);
    for (px, degenerate) in image
        .pixels
        .chunks_exact_mut(CHANNELS)
        .zip(smoothed.chunks_exact(3))
    {
        for c in 0..3 {
            px[c] = blend_channel(degenerate[c] as f32, px[c], factor);
        }
    }
}

/// Apply [`SMOOTH_KERNEL`] to the RGB channels, returning a packed RGB buffer.
fn smooth_rgb(image: &DecodedImage) -> Vec<u8> {
    let (w, h) = (image.width as usize, image.height as usize);
    let mut output: Vec<u8> = image
        .pixels
        .chunks_exact(CHANNELS)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    if w < 3 || h < 3 {
        return output;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut sum = [0.0f32; 3];
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let idx = ((y + ky - 1) * w + (x + kx - 1)) * CHANNELS;
                    for c in 0..3 {
                        sum[c] += image.pixels[idx + c] as f32 * weight;
                    }
                }
            }
            let out_idx = (y * w + x) * 3;
            for c in 0..3 {
                output[out_idx + c] = (sum[c] / SMOOTH_DIVISOR).clamp(0.0, 255.0).round() as u8;
            }
        }
    }

    output
}

/// Gaussian blur with standard deviation `sigma`, over all four channels.
///
/// # Errors
///
/// Returns `TransformError::BufferMismatch` if the source buffer does not
/// match its dimensions.
pub fn apply_blur(image: DecodedImage, sigma: f64) -> Result<DecodedImage, TransformError> {
    let mismatch = TransformError::mismatch(&image);
    let rgba = image.into_rgba_image().ok_or(mismatch)?;
    Ok(DecodedImage::from_rgba_image(imageops::blur(
        &rgba,
        sigma as f32,
    )))
}

/// Replace RGB with the pixel's luminance and make the pixel opaque.
///
/// Transparent pixels keep their stored color, so fully transparent
/// black padding becomes opaque black.
pub fn apply_grayscale(image: &mut DecodedImage) {
    for px in image.pixels.chunks_exact_mut(CHANNELS) {
        let lum = calculate_luminance_u8(px[0], px[1], px[2]);
        px[0] = lum;
        px[1] = lum;
        px[2] = lum;
        px[3] = 255;
    }
}

/// Invert RGB channels. Alpha is preserved.
pub fn apply_invert(image: &mut DecodedImage) {
    for px in image.pixels.chunks_exact_mut(CHANNELS) {
        for c in &mut px[..3] {
            *c = 255 - *c;
        }
    }
}
