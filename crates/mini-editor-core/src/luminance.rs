//! Luminance calculation using ITU-R BT.601 weights.
//!
//! Shared by the grayscale stage, the saturation degenerate image and the
//! mean gray level used by contrast.
//!
//! Computed in 16-bit fixed point:
//! ```text
//! L = (R * 19595 + G * 38470 + B * 7471 + 0x8000) >> 16
//! ```
//! which is `0.299 R + 0.587 G + 0.114 B` rounded to the nearest level.

use crate::decode::CHANNELS;

/// BT.601 red weight, scaled by 2^16 (0.299).
pub const LUMINANCE_R: u32 = 19595;

/// BT.601 green weight, scaled by 2^16 (0.587).
pub const LUMINANCE_G: u32 = 38470;

/// BT.601 blue weight, scaled by 2^16 (0.114).
pub const LUMINANCE_B: u32 = 7471;

const LUMINANCE_SHIFT: u32 = 16;

/// Calculate luminance from u8 RGB values (0 to 255).
///
/// # Returns
/// Luminance value (0-255)
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let weighted =
        LUMINANCE_R * r as u32 + LUMINANCE_G * g as u32 + LUMINANCE_B * b as u32;
    ((weighted + (1 << (LUMINANCE_SHIFT - 1))) >> LUMINANCE_SHIFT) as u8
}

/// Mean luminance over every pixel of an RGBA buffer, rounded to the nearest level.
///
/// Alpha is ignored, matching a plain grayscale conversion of the whole frame.
/// Returns 0 for an empty buffer.
pub fn mean_luminance(pixels: &[u8]) -> u8 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for px in pixels.chunks_exact(CHANNELS) {
        sum += calculate_luminance_u8(px[0], px[1], px[2]) as u64;
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    ((sum as f64 / count as f64).round()).min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_unity() {
        assert_eq!(LUMINANCE_R + LUMINANCE_G + LUMINANCE_B, 1 << LUMINANCE_SHIFT);
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(calculate_luminance_u8(255, 255, 255), 255);
        assert_eq!(calculate_luminance_u8(0, 0, 0), 0);
    }

    #[test]
    fn test_luminance_gray_preserves_value() {
        for v in 0..=255u8 {
            assert_eq!(calculate_luminance_u8(v, v, v), v);
        }
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(calculate_luminance_u8(255, 0, 0), 76);
        assert_eq!(calculate_luminance_u8(0, 255, 0), 150);
        assert_eq!(calculate_luminance_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_luminance_mixed() {
        // 0.299 * 150 + 0.587 * 100 + 0.114 * 100 = 114.85
        assert_eq!(calculate_luminance_u8(150, 100, 100), 115);
    }

    #[test]
    fn test_mean_luminance() {
        // One black and one white pixel average to mid gray
        let pixels = [0, 0, 0, 255, 255, 255, 255, 0];
        assert_eq!(mean_luminance(&pixels), 128);
    }

    #[test]
    fn test_mean_luminance_empty() {
        assert_eq!(mean_luminance(&[]), 0);
    }
}
