//! Decoding of uploaded bytes in any format the `image` crate was built with.

use std::io::Cursor;

use image::{ImageError, ImageReader};

use super::{DecodeError, DecodedImage};

/// Decode an uploaded image and normalize it to 8-bit RGBA.
///
/// The container format is sniffed from the magic bytes, never from a
/// filename or declared media type. Animated formats yield their first
/// frame. EXIF orientation is not applied.
///
/// # Errors
///
/// - `DecodeError::Empty` for a zero-length payload
/// - `DecodeError::InvalidFormat` if the bytes match no enabled decoder
/// - `DecodeError::CorruptedFile` if a decoder accepted the header but failed later
/// - `DecodeError::LimitsExceeded` if the image is too large to allocate
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(map_image_error)?;

    // Color-mode normalization: grayscale, RGB and 16-bit inputs all become RGBA8
    Ok(DecodedImage::from_rgba_image(img.into_rgba8()))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        ImageError::Limits(e) => DecodeError::LimitsExceeded(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}
