//! Mirror operations. Both run in place and never change dimensions.

use crate::decode::{DecodedImage, CHANNELS};

/// Mirror an image left-to-right.
pub fn flip_horizontal(image: &mut DecodedImage) {
    let width = image.width as usize;
    let row_bytes = width * CHANNELS;
    if row_bytes == 0 {
        return;
    }

    for row in image.pixels.chunks_exact_mut(row_bytes) {
        for x in 0..width / 2 {
            let left = x * CHANNELS;
            let right = (width - 1 - x) * CHANNELS;
            for c in 0..CHANNELS {
                row.swap(left + c, right + c);
            }
        }
    }
}

/// Flip an image top-to-bottom.
pub fn flip_vertical(image: &mut DecodedImage) {
    let height = image.height as usize;
    let row_bytes = image.width as usize * CHANNELS;
    if row_bytes == 0 {
        return;
    }

    for y in 0..height / 2 {
        let (top, bottom) = image.pixels.split_at_mut((height - 1 - y) * row_bytes);
        top[y * row_bytes..(y + 1) * row_bytes].swap_with_slice(&mut bottom[..row_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_flip_horizontal_mirrors_columns() {
        let original = test_image(5, 3);
        let mut img = original.clone();
        flip_horizontal(&mut img);

        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(img.pixel(x, y), original.pixel(4 - x, y));
            }
        }
    }

    #[test]
    fn test_flip_vertical_mirrors_rows() {
        let original = test_image(4, 5);
        let mut img = original.clone();
        flip_vertical(&mut img);

        for y in 0..5 {
            for x in 0..4 {
                assert_eq!(img.pixel(x, y), original.pixel(x, 4 - y));
            }
        }
    }

    #[test]
    fn test_double_flip_is_identity() {
        let original = test_image(7, 6);
        let mut img = original.clone();

        flip_horizontal(&mut img);
        flip_horizontal(&mut img);
        flip_vertical(&mut img);
        flip_vertical(&mut img);

        assert_eq!(img, original);
    }

    #[test]
    fn test_flip_single_pixel() {
        let original = test_image(1, 1);
        let mut img = original.clone();
        flip_horizontal(&mut img);
        flip_vertical(&mut img);
        assert_eq!(img, original);
    }

    #[test]
    fn test_flip_keeps_alpha_with_pixel() {
        let mut img = DecodedImage::transparent(2, 1);
        img.pixels[0..4].copy_from_slice(&[1, 2, 3, 50]);
        flip_horizontal(&mut img);
        assert_eq!(img.pixel(1, 0), [1, 2, 3, 50]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
    }
}
