//! Uniform scaling.
//!
//! Wraps the `image` crate's resampler. Both dimensions are multiplied by
//! the same factor and truncated to whole pixels, never below one pixel.
//!
//! Resampling runs on premultiplied `f32` samples, so fully transparent
//! pixels (such as square padding) contribute no color to their neighbors.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use super::TransformError;
use crate::decode::DecodedImage;

/// Filter used by the render pipeline's scale stage.
pub const SCALE_FILTER: FilterType = FilterType::Lanczos3;

/// Calculate the output dimensions for a uniform scale factor.
///
/// Each dimension is truncated independently and floored at 1 pixel.
///
/// # Example
///
/// ```
/// use mini_editor_core::transform::compute_scaled_dimensions;
///
/// assert_eq!(compute_scaled_dimensions(100, 50, 0.5), (50, 25));
/// assert_eq!(compute_scaled_dimensions(1, 1, 0.05), (1, 1));
/// ```
pub fn compute_scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let scale_dim = |dim: u32| -> u32 {
        let scaled = (dim as f64 * factor).trunc();
        if scaled >= u32::MAX as f64 {
            u32::MAX
        } else {
            (scaled as u32).max(1)
        }
    };
    (scale_dim(width), scale_dim(height))
}

/// Resize an image by a uniform factor.
///
/// # Errors
///
/// Returns `TransformError::BufferMismatch` if the source buffer does not
/// match its dimensions.
pub fn apply_scale(image: DecodedImage, factor: f64) -> Result<DecodedImage, TransformError> {
    let (width, height) = compute_scaled_dimensions(image.width, image.height, factor);

    // Fast path: if dimensions match, nothing to resample
    if image.width == width && image.height == height {
        return Ok(image);
    }

    if !image.is_consistent() {
        return Err(TransformError::mismatch(&image));
    }

    let premultiplied: Vec<f32> = image
        .pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as f32 / 255.0;
            [
                px[0] as f32 / 255.0 * a,
                px[1] as f32 / 255.0 * a,
                px[2] as f32 / 255.0 * a,
                a,
            ]
        })
        .collect();
    let source: ImageBuffer<Rgba<f32>, Vec<f32>> =
        ImageBuffer::from_raw(image.width, image.height, premultiplied)
            .ok_or_else(|| TransformError::mismatch(&image))?;
    let resized = imageops::resize(&source, width, height, SCALE_FILTER);

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for px in resized.pixels() {
        pixels.extend_from_slice(&unpremultiply(px.0));
    }

    Ok(DecodedImage::new(width, height, pixels))
}

/// Convert a premultiplied `f32` sample back to straight-alpha RGBA8.
fn unpremultiply([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    let alpha = (a.clamp(0.0, 1.0) * 255.0).round();
    if alpha < 1.0 {
        return [0, 0, 0, 0];
    }
    let a = a.clamp(0.0, 1.0);
    let channel = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(r), channel(g), channel(b), alpha as u8]
}


// ============================================================================
// Property-Based Tests
// ============================================================================
