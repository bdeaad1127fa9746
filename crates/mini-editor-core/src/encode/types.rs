//! Encoded output and encoding errors.

use thiserror::Error;

use crate::params::OutputFormat;

/// Base name of every suggested download.
pub const OUTPUT_STEM: &str = "edited";

/// Errors that can occur while encoding the final image.
///
/// None of these are caused by client input. They indicate a pixel buffer
/// that broke the pipeline's invariants or a codec failure.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Image is larger than the codec can represent
    #[error("{format} cannot encode {width}x{height} (limit {max} per side)")]
    TooLarge {
        format: &'static str,
        width: u32,
        height: u32,
        max: u32,
    },

    /// The codec itself failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Encoded image bytes plus the format they were written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl EncodedOutput {
    pub fn new(bytes: Vec<u8>, format: OutputFormat) -> Self {
        Self { bytes, format }
    }

    /// MIME type, e.g. `image/png`.
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    /// Extension without the dot, e.g. `jpg`.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Suggested download name, `edited.<ext>`.
    pub fn filename(&self) -> String {
        format!("{OUTPUT_STEM}.{}", self.extension())
    }

    /// Value for a `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames() {
        let png = EncodedOutput::new(vec![1, 2, 3], OutputFormat::Png);
        assert_eq!(png.filename(), "edited.png");
        assert_eq!(png.media_type(), "image/png");
        assert_eq!(png.len(), 3);

        let jpeg = EncodedOutput::new(Vec::new(), OutputFormat::Jpeg);
        assert_eq!(jpeg.filename(), "edited.jpg");
        assert_eq!(jpeg.media_type(), "image/jpeg");
        assert!(jpeg.is_empty());

        let webp = EncodedOutput::new(Vec::new(), OutputFormat::WebP);
        assert_eq!(webp.filename(), "edited.webp");
    }

    #[test]
    fn test_content_disposition() {
        let out = EncodedOutput::new(Vec::new(), OutputFormat::WebP);
        assert_eq!(
            out.content_disposition(),
            "attachment; filename=\"edited.webp\""
        );
    }
}
