//! The render pipeline: decode, transform in a fixed order, encode.
//!
//! Stages run in the order of [`STAGES`]. Each stage is gated by a cheap
//! predicate on [`EditParameters`] and skipped entirely at its identity
//! value, so e.g. `brightness = 1` never touches pixel data. Color mode
//! normalization to RGBA happens during decode and is not a table entry.

use thiserror::Error;

use crate::adjustments::{
    adjust_brightness, adjust_contrast, adjust_saturation, adjust_sharpness, apply_blur,
    apply_grayscale, apply_invert,
};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_image, EncodeError, EncodedOutput};
use crate::params::{EditParameters, ParameterParseError, RawParams};
use crate::transform::{
    apply_rotation, apply_scale, flip_horizontal, flip_vertical, pad_to_square, TransformError,
};

/// Whether a failure was caused by the request or by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad upload or malformed form values
    ClientInput,
    /// Invariant violation or codec failure
    Internal,
}

/// Any failure of a render request.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not decode upload: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid parameter: {0}")]
    Parameters(#[from] ParameterParseError),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Decode(_) | RenderError::Parameters(_) => ErrorKind::ClientInput,
            RenderError::Transform(_) | RenderError::Encode(_) => ErrorKind::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::ClientInput
    }
}

/// One skippable pipeline step.
pub struct Stage {
    pub name: &'static str,
    /// True when the stage has work to do for these parameters.
    pub enabled: fn(&EditParameters) -> bool,
    pub apply: fn(DecodedImage, &EditParameters) -> Result<DecodedImage, TransformError>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// Transform stages in execution order.
pub const STAGES: &[Stage] = &[
    Stage {
        name: "square_pad",
        enabled: |p| p.crop_square,
        apply: square_pad_stage,
    },
    Stage {
        name: "flip_h",
        enabled: |p| p.flip_h,
        apply: flip_h_stage,
    },
    Stage {
        name: "flip_v",
        enabled: |p| p.flip_v,
        apply: flip_v_stage,
    },
    Stage {
        name: "rotate",
        enabled: |p| p.rotate != 0.0,
        apply: rotate_stage,
    },
    Stage {
        name: "scale",
        enabled: |p| p.scale != 1.0,
        apply: scale_stage,
    },
    Stage {
        name: "brightness",
        enabled: |p| p.brightness != 1.0,
        apply: brightness_stage,
    },
    Stage {
        name: "contrast",
        enabled: |p| p.contrast != 1.0,
        apply: contrast_stage,
    },
    Stage {
        name: "saturation",
        enabled: |p| p.saturation != 1.0,
        apply: saturation_stage,
    },
    Stage {
        name: "sharpness",
        enabled: |p| p.sharpness != 1.0,
        apply: sharpness_stage,
    },
    Stage {
        name: "blur",
        enabled: |p| p.blur != 0.0,
        apply: blur_stage,
    },
    Stage {
        name: "grayscale",
        enabled: |p| p.grayscale,
        apply: grayscale_stage,
    },
    Stage {
        name: "invert",
        enabled: |p| p.invert,
        apply: invert_stage,
    },
];

fn square_pad_stage(
    image: DecodedImage,
    _: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    Ok(pad_to_square(&image))
}

fn flip_h_stage(mut image: DecodedImage, _: &EditParameters) -> Result<DecodedImage, TransformError> {
    flip_horizontal(&mut image);
    Ok(image)
}

fn flip_v_stage(mut image: DecodedImage, _: &EditParameters) -> Result<DecodedImage, TransformError> {
    flip_vertical(&mut image);
    Ok(image)
}

fn rotate_stage(image: DecodedImage, p: &EditParameters) -> Result<DecodedImage, TransformError> {
    Ok(apply_rotation(&image, p.rotate))
}

fn scale_stage(image: DecodedImage, p: &EditParameters) -> Result<DecodedImage, TransformError> {
    apply_scale(image, p.scale)
}

fn brightness_stage(
    mut image: DecodedImage,
    p: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    adjust_brightness(&mut image, p.brightness);
    Ok(image)
}

fn contrast_stage(
    mut image: DecodedImage,
    p: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    adjust_contrast(&mut image, p.contrast);
    Ok(image)
}

fn saturation_stage(
    mut image: DecodedImage,
    p: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    adjust_saturation(&mut image, p.saturation);
    Ok(image)
}

fn sharpness_stage(
    mut image: DecodedImage,
    p: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    adjust_sharpness(&mut image, p.sharpness);
    Ok(image)
}

fn blur_stage(image: DecodedImage, p: &EditParameters) -> Result<DecodedImage, TransformError> {
    apply_blur(image, p.blur)
}

fn grayscale_stage(
    mut image: DecodedImage,
    _: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    apply_grayscale(&mut image);
    Ok(image)
}

fn invert_stage(mut image: DecodedImage, _: &EditParameters) -> Result<DecodedImage, TransformError> {
    apply_invert(&mut image);
    Ok(image)
}

/// Names of the stages that would run for `params`, in order.
pub fn planned_stages(params: &EditParameters) -> Vec<&'static str> {
    STAGES
        .iter()
        .filter(|stage| (stage.enabled)(params))
        .map(|stage| stage.name)
        .collect()
}

/// Run every enabled stage over `image`.
///
/// `params` is used as given; callers that did not build it through the
/// normalizer should pass `params.clamped()`.
pub fn apply_edits(
    image: DecodedImage,
    params: &EditParameters,
) -> Result<DecodedImage, TransformError> {
    let mut image = image;
    for stage in STAGES {
        if !(stage.enabled)(params) {
            continue;
        }
        let (w, h) = (image.width, image.height);
        image = (stage.apply)(image, params)?;
        tracing::debug!(
            stage = stage.name,
            from_width = w,
            from_height = h,
            width = image.width,
            height = image.height,
            "applied stage"
        );
    }
    Ok(image)
}

/// Decode `bytes`, apply `params` and encode the result.
///
/// Parameters are clamped before use. Decode failures are client errors;
/// nothing is encoded when any step fails.
pub fn render(bytes: &[u8], params: &EditParameters) -> Result<EncodedOutput, RenderError> {
    let params = params.clamped();
    let image = decode_image(bytes)?;
    tracing::debug!(
        width = image.width,
        height = image.height,
        stages = ?planned_stages(&params),
        "decoded upload"
    );

    let image = apply_edits(image, &params)?;
    let output = encode_image(&image, params.format, params.quality)?;
    Ok(output)
}

/// Normalize raw form values, then [`render`].
///
/// Parameters are checked before the upload is decoded, so a malformed
/// field is reported even when the image is also bad.
pub fn render_form(bytes: &[u8], raw: &RawParams) -> Result<EncodedOutput, RenderError> {
    let params = raw.normalize()?;
    render(bytes, &params)
}
