//! Output encoding.
//!
//! [`encode_image`] turns the final RGBA buffer into PNG, JPEG or WebP bytes:
//!
//! - PNG keeps alpha and ignores quality.
//! - JPEG composites alpha over white, then encodes at the given quality.
//! - WebP keeps alpha and encodes lossily at the given quality with maximum effort.

mod jpeg;
mod png;
mod types;
mod webp;

pub use self::jpeg::{composite_over_white, encode_jpeg, encode_jpeg_rgba, JPEG_MAX_DIMENSION};
pub use self::png::encode_png;
pub use self::types::{EncodeError, EncodedOutput, OUTPUT_STEM};
pub use self::webp::{encode_webp, WEBP_MAX_DIMENSION};

use crate::decode::{DecodedImage, CHANNELS};
use crate::params::OutputFormat;

/// Encode an RGBA image in the requested format.
///
/// # Errors
///
/// Returns [`EncodeError`] if the buffer does not match its dimensions or
/// the codec fails.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedOutput, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let bytes = match format {
        OutputFormat::Png => encode_png(&image.pixels, width, height)?,
        OutputFormat::Jpeg => encode_jpeg_rgba(&image.pixels, width, height, quality)?,
        OutputFormat::WebP => encode_webp(&image.pixels, width, height, quality)?,
    };

    tracing::debug!(
        format = format.extension(),
        width,
        height,
        bytes = bytes.len(),
        "encoded image"
    );

    Ok(EncodedOutput::new(bytes, format))
}
