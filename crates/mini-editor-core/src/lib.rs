//! Mini Editor Core - parameter normalization and render pipeline
//!
//! This crate turns an uploaded image plus a handful of form fields into a
//! re-encoded output image. Every call is independent: nothing is cached or
//! shared between renders.
//!
//! - [`params`] parses and clamps raw form values into [`EditParameters`]
//! - [`pipeline`] decodes, runs the fixed stage sequence and encodes
//! - [`transform`] holds the geometric stages (pad, flip, rotate, scale)
//! - [`adjustments`] holds the tone, color and filter stages
//! - [`encode`] writes PNG, JPEG or WebP

pub mod adjustments;
pub mod decode;
pub mod encode;
pub mod luminance;
pub mod params;
pub mod pipeline;
pub mod transform;

pub use decode::{decode_image, DecodeError, DecodedImage};
pub use encode::{encode_image, EncodeError, EncodedOutput};
pub use params::{EditParameters, OutputFormat, ParameterParseError, RawParams};
pub use pipeline::{apply_edits, render, render_form, ErrorKind, RenderError, STAGES};
pub use transform::{
    apply_rotation, compute_rotated_bounds, TransformError, ROTATE_FILTER, SCALE_FILTER,
};
