//! Square padding.
//!
//! Reframes an image onto a square transparent canvas whose side is the
//! longer of the two dimensions. No source pixel is discarded: this is a
//! lossless reframe, the opposite of a center crop.
//!
//! # Example
//!
//! ```
//! use mini_editor_core::decode::DecodedImage;
//! use mini_editor_core::transform::pad_to_square;
//!
//! let image = DecodedImage::filled(100, 200, [255, 0, 0, 255]);
//! let square = pad_to_square(&image);
//! assert_eq!((square.width, square.height), (200, 200));
//! ```

use crate::decode::{DecodedImage, CHANNELS};

/// Compute the square canvas side and the offset of the original content.
///
/// Returns `(side, offset_x, offset_y)`. Odd leftovers go to the right
/// and bottom borders (offsets round down).
pub fn square_placement(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.max(height);
    (side, (side - width) / 2, (side - height) / 2)
}

/// Center an image on a transparent square canvas of side `max(width, height)`.
pub fn pad_to_square(image: &DecodedImage) -> DecodedImage {
    // Fast path: already square
    if image.width == image.height {
        return image.clone();
    }

    let (side, offset_x, offset_y) = square_placement(image.width, image.height);
    let mut output = DecodedImage::transparent(side, side);

    let row_bytes = image.width as usize * CHANNELS;
    for y in 0..image.height {
        let src_start = image.index_of(0, y);
        let dst_start = output.index_of(offset_x, y + offset_y);
        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create an opaque test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
                pixels.push(255);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_square_is_unchanged() {
        let img = test_image(40, 40);
        assert_eq!(pad_to_square(&img), img);
    }

    #[test]
    fn test_portrait_pads_left_and_right() {
        let img = test_image(100, 200);
        let result = pad_to_square(&img);

        assert_eq!((result.width, result.height), (200, 200));
        // Left and right borders are transparent
        assert_eq!(result.pixel(0, 100), [0, 0, 0, 0]);
        assert_eq!(result.pixel(49, 100), [0, 0, 0, 0]);
        assert_eq!(result.pixel(150, 100), [0, 0, 0, 0]);
        assert_eq!(result.pixel(199, 0), [0, 0, 0, 0]);
        // Content starts at x = 50
        assert_eq!(result.pixel(50, 0), img.pixel(0, 0));
        assert_eq!(result.pixel(149, 199), img.pixel(99, 199));
    }

    #[test]
    fn test_landscape_pads_top_and_bottom() {
        let img = test_image(30, 10);
        let result = pad_to_square(&img);

        assert_eq!((result.width, result.height), (30, 30));
        assert_eq!(result.pixel(15, 9), [0, 0, 0, 0]);
        assert_eq!(result.pixel(15, 10), img.pixel(15, 0));
        assert_eq!(result.pixel(15, 19), img.pixel(15, 9));
        assert_eq!(result.pixel(15, 20), [0, 0, 0, 0]);
    }

    #[test]
    fn test_odd_difference_rounds_offset_down() {
        assert_eq!(square_placement(10, 13), (13, 1, 0));
        assert_eq!(square_placement(13, 10), (13, 0, 1));

        let img = test_image(10, 13);
        let result = pad_to_square(&img);
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(result.pixel(1, 0), img.pixel(0, 0));
        assert_eq!(result.pixel(10, 12), img.pixel(9, 12));
        assert_eq!(result.pixel(11, 12), [0, 0, 0, 0]);
        assert_eq!(result.pixel(12, 12), [0, 0, 0, 0]);
    }

    #[test]
    fn test_single_row_image() {
        let img = test_image(5, 1);
        let result = pad_to_square(&img);
        assert_eq!((result.width, result.height), (5, 5));
        assert_eq!(result.pixel(3, 2), img.pixel(3, 0));
    }

    #[test]
    fn test_existing_transparency_is_kept() {
        let img = DecodedImage::filled(4, 2, [9, 8, 7, 100]);
        let result = pad_to_square(&img);
        assert_eq!(result.pixel(0, 1), [9, 8, 7, 100]);
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 0]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=60, 1u32..=60)
    }

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 251) as u8;
                pixels.extend_from_slice(&[v, v.wrapping_add(1), v.wrapping_add(2), 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: The output is a square of side max(width, height).
        #[test]
        fn prop_output_is_square(
            (width, height) in dimensions_strategy(),
        ) {
            let result = pad_to_square(&test_image(width, height));
            prop_assert_eq!(result.width, width.max(height));
            prop_assert_eq!(result.height, width.max(height));
            prop_assert!(result.is_consistent());
        }

        /// Property: The centered region equals the original exactly and
        /// every other pixel is fully transparent.
        #[test]
        fn prop_content_preserved_border_transparent(
            (width, height) in dimensions_strategy(),
        ) {
            let img = test_image(width, height);
            let result = pad_to_square(&img);
            let (side, ox, oy) = square_placement(width, height);

            for y in 0..side {
                for x in 0..side {
                    let inside = x >= ox && x < ox + width && y >= oy && y < oy + height;
                    if inside {
                        prop_assert_eq!(result.pixel(x, y), img.pixel(x - ox, y - oy));
                    } else {
                        prop_assert_eq!(result.pixel(x, y), [0, 0, 0, 0]);
                    }
                }
            }
        }
    }
}
