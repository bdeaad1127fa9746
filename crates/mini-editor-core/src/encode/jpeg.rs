//! JPEG encoding.
//!
//! JPEG has no alpha channel, so RGBA input is first composited over an
//! opaque white background using alpha as the blend mask. Encoding goes
//! through `jpeg-encoder` with Huffman tables optimized for each image.

use jpeg_encoder::{ColorType, Encoder};

use super::EncodeError;
use crate::decode::CHANNELS;

/// Largest width or height a baseline JPEG frame header can hold.
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

/// Composite RGBA pixels over white, returning packed RGB.
///
/// Each channel becomes `round((c * a + 255 * (255 - a)) / 255)`, so opaque
/// pixels are unchanged and fully transparent ones become white.
pub fn composite_over_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let a = px[3] as u32;
        if a == 255 {
            rgb.extend_from_slice(&px[..3]);
            continue;
        }
        for &c in &px[..3] {
            let blended = c as u32 * a + 255 * (255 - a);
            rgb.push(((blended + 127) / 255) as u8);
        }
    }
    rgb
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    if width > JPEG_MAX_DIMENSION || height > JPEG_MAX_DIMENSION {
        return Err(EncodeError::TooLarge {
            format: "JPEG",
            width,
            height,
            max: JPEG_MAX_DIMENSION,
        });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_optimized_huffman_tables(true);

    encoder
        .encode(pixels, width as u16, height as u16, ColorType::Rgb)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(buffer)
}

/// Composite RGBA over white and encode as JPEG.
pub fn encode_jpeg_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&composite_over_white(rgba), width, height, quality)
}
