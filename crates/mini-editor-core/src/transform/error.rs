use thiserror::Error;

/// Errors raised by transform stages.
///
/// Every stage receives a buffer produced by the decoder or a previous
/// stage, so these only surface when that buffer is internally inconsistent.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Pixel buffer length disagrees with the recorded dimensions.
    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} RGBA")]
    BufferMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

impl TransformError {
    pub(crate) fn mismatch(image: &crate::decode::DecodedImage) -> Self {
        TransformError::BufferMismatch {
            width: image.width,
            height: image.height,
            actual: image.pixels.len(),
        }
    }
}
