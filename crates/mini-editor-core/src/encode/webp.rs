//! Lossy WebP encoding with alpha, through libwebp.

use super::EncodeError;

/// Largest width or height libwebp accepts.
pub const WEBP_MAX_DIMENSION: u32 = 16383;

/// Highest libwebp compression effort.
const WEBP_METHOD: i32 = 6;

/// Encode RGBA pixel data to lossy WebP at `quality` (1 to 100).
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(EncodeError::TooLarge {
            format: "WebP",
            width,
            height,
            max: WEBP_MAX_DIMENSION,
        });
    }

    let mut config = ::webp::WebPConfig::new().map_err(|_| EncodeError::EncodingFailed {
        format: "WebP",
        message: "could not initialize encoder config".to_string(),
    })?;
    config.lossless = 0;
    config.quality = quality.clamp(1, 100) as f32;
    config.method = WEBP_METHOD;

    let encoder = ::webp::Encoder::from_rgba(pixels, width, height);
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "WebP",
            message: format!("{e:?}"),
        })?;

    Ok(memory.to_vec())
}
