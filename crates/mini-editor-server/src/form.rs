//! Multipart form parsing for the render endpoint.

use axum::extract::Multipart;
use mini_editor_core::RawParams;

use crate::error::ApiError;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// A parsed render request: the uploaded bytes plus raw edit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderForm {
    pub file: Vec<u8>,
    pub params: RawParams,
}

impl RenderForm {
    /// Read every field of the form. Unknown fields are skipped.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingFile`] if no `file` field was sent, or the mapped
    /// multipart error if the body could not be read.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut file = None;
        let mut params = RawParams::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                file = Some(field.bytes().await?.to_vec());
                continue;
            }

            let value = field.text().await?;
            if !params.set(&name, value) {
                tracing::debug!(field = %name, "ignoring unknown form field");
            }
        }

        let file = file.ok_or(ApiError::MissingFile)?;
        Ok(Self { file, params })
    }
}
