//! Edit parameters and the normalizer that produces them from raw form fields.
//!
//! [`RawParams`] holds form values exactly as received. [`RawParams::normalize`]
//! parses each field, applies defaults for absent ones and clamps every number
//! into its documented range. Out-of-range numbers are never an error; text
//! that is not a number (or boolean) is.
//!
//! | Field | Range | Default |
//! |---|---|---|
//! | rotate | [-180, 180] | 0 |
//! | scale | [0.05, 5] | 1 |
//! | brightness, contrast, saturation | [0, 3] | 1 |
//! | sharpness | [0, 4] | 1 |
//! | blur | [0, 20] | 0 |
//! | quality | [1, 100] | 92 |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive bounds of the `rotate` field, in degrees.
pub const ROTATE_RANGE: (f64, f64) = (-180.0, 180.0);
/// Inclusive bounds of the `scale` field.
pub const SCALE_RANGE: (f64, f64) = (0.05, 5.0);
/// Inclusive bounds shared by brightness, contrast and saturation.
pub const ENHANCE_RANGE: (f64, f64) = (0.0, 3.0);
/// Inclusive bounds of the `sharpness` field.
pub const SHARPNESS_RANGE: (f64, f64) = (0.0, 4.0);
/// Inclusive bounds of the `blur` field.
pub const BLUR_RANGE: (f64, f64) = (0.0, 20.0);
/// Inclusive bounds of the `quality` field.
pub const QUALITY_RANGE: (u8, u8) = (1, 100);
/// Encoder quality used when none is given.
pub const DEFAULT_QUALITY: u8 = 92;

/// Error raised when a form value cannot be read as its expected type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterParseError {
    /// A float field held text that is not a number.
    #[error("field `{field}` expects a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The quality field held text that is not a whole number.
    #[error("field `{field}` expects an integer, got {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    /// A boolean field held text that is not a recognized boolean.
    #[error("field `{field}` expects a boolean, got {value:?}")]
    InvalidBool { field: &'static str, value: String },
}

/// Output encoding requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// Resolve a `fmt` form value. Unrecognized names fall back to PNG.
    pub fn from_fmt(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Self::Jpeg,
            "webp" => Self::WebP,
            _ => Self::Png,
        }
    }

    /// MIME type of the encoded bytes.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// File extension used in the suggested download name.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

/// Canonical, bounded edit parameters.
///
/// Values built through [`RawParams::normalize`] are always in range. Values
/// deserialized or constructed by hand can be brought into range with
/// [`EditParameters::clamped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParameters {
    pub flip_h: bool,
    pub flip_v: bool,
    /// Degrees, positive is counter-clockwise
    pub rotate: f64,
    pub scale: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub sharpness: f64,
    /// Gaussian standard deviation in pixels
    pub blur: f64,
    pub grayscale: bool,
    pub invert: bool,
    /// Pad onto a transparent square canvas (no pixels are discarded)
    pub crop_square: bool,
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self {
            flip_h: false,
            flip_v: false,
            rotate: 0.0,
            scale: 1.0,
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            sharpness: 1.0,
            blur: 0.0,
            grayscale: false,
            invert: false,
            crop_square: false,
            format: OutputFormat::Png,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Clamp into `range`, replacing NaN with `fallback`.
fn bounded(value: f64, range: (f64, f64), fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(range.0, range.1)
    }
}

impl EditParameters {
    /// Create parameters with every field at its identity value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a set of `(name, value)` form fields.
    ///
    /// Shorthand for [`RawParams::from_pairs`] followed by
    /// [`RawParams::normalize`].
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, ParameterParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        RawParams::from_pairs(fields).normalize()
    }

    /// Return a copy with every numeric field clamped to its range.
    ///
    /// Idempotent: `p.clamped().clamped() == p.clamped()`.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            rotate: bounded(self.rotate, ROTATE_RANGE, defaults.rotate),
            scale: bounded(self.scale, SCALE_RANGE, defaults.scale),
            brightness: bounded(self.brightness, ENHANCE_RANGE, defaults.brightness),
            contrast: bounded(self.contrast, ENHANCE_RANGE, defaults.contrast),
            saturation: bounded(self.saturation, ENHANCE_RANGE, defaults.saturation),
            sharpness: bounded(self.sharpness, SHARPNESS_RANGE, defaults.sharpness),
            blur: bounded(self.blur, BLUR_RANGE, defaults.blur),
            quality: self.quality.clamp(QUALITY_RANGE.0, QUALITY_RANGE.1),
            ..self.clone()
        }
    }

    /// True when every transform stage would be skipped.
    ///
    /// Output format and quality do not count; they only affect encoding.
    pub fn is_identity(&self) -> bool {
        !self.crop_square
            && !self.flip_h
            && !self.flip_v
            && self.rotate == 0.0
            && self.scale == 1.0
            && self.brightness == 1.0
            && self.contrast == 1.0
            && self.saturation == 1.0
            && self.sharpness == 1.0
            && self.blur == 0.0
            && !self.grayscale
            && !self.invert
    }
}

/// Unvalidated form values, one optional string per known field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pub fmt: Option<String>,
    pub quality: Option<String>,
    pub flip_h: Option<String>,
    pub flip_v: Option<String>,
    pub rotate: Option<String>,
    pub scale: Option<String>,
    pub brightness: Option<String>,
    pub contrast: Option<String>,
    pub saturation: Option<String>,
    pub sharpness: Option<String>,
    pub blur: Option<String>,
    pub grayscale: Option<String>,
    pub invert: Option<String>,
    pub crop_square: Option<String>,
}

impl RawParams {
    /// Build from `(name, value)` pairs. Unknown names are ignored and a
    /// repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (name, value) in pairs {
            raw.set(name.as_ref(), value);
        }
        raw
    }

    /// Store one field by name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "fmt" => &mut self.fmt,
            "quality" => &mut self.quality,
            "flip_h" => &mut self.flip_h,
            "flip_v" => &mut self.flip_v,
            "rotate" => &mut self.rotate,
            "scale" => &mut self.scale,
            "brightness" => &mut self.brightness,
            "contrast" => &mut self.contrast,
            "saturation" => &mut self.saturation,
            "sharpness" => &mut self.sharpness,
            "blur" => &mut self.blur,
            "grayscale" => &mut self.grayscale,
            "invert" => &mut self.invert,
            "crop_square" => &mut self.crop_square,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    /// Parse, default and clamp every field.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterParseError`] for the first field whose text cannot
    /// be read as its type. Out-of-range values are clamped, not rejected.
    pub fn normalize(&self) -> Result<EditParameters, ParameterParseError> {
        let defaults = EditParameters::default();

        let float = |field: &'static str,
                     raw: &Option<String>,
                     (lo, hi): (f64, f64),
                     default: f64|
         -> Result<f64, ParameterParseError> {
            match present(raw) {
                Some(text) => Ok(parse_float(field, text)?.clamp(lo, hi)),
                None => Ok(default),
            }
        };
        let flag = |field: &'static str, raw: &Option<String>| match present(raw) {
            Some(text) => parse_bool(field, text),
            None => Ok(false),
        };

        let quality = match present(&self.quality) {
            Some(text) => parse_quality(text)?,
            None => defaults.quality,
        };
        let format = present(&self.fmt)
            .map(OutputFormat::from_fmt)
            .unwrap_or_default();

        Ok(EditParameters {
            flip_h: flag("flip_h", &self.flip_h)?,
            flip_v: flag("flip_v", &self.flip_v)?,
            rotate: float("rotate", &self.rotate, ROTATE_RANGE, defaults.rotate)?,
            scale: float("scale", &self.scale, SCALE_RANGE, defaults.scale)?,
            brightness: float(
                "brightness",
                &self.brightness,
                ENHANCE_RANGE,
                defaults.brightness,
            )?,
            contrast: float("contrast", &self.contrast, ENHANCE_RANGE, defaults.contrast)?,
            saturation: float(
                "saturation",
                &self.saturation,
                ENHANCE_RANGE,
                defaults.saturation,
            )?,
            sharpness: float(
                "sharpness",
                &self.sharpness,
                SHARPNESS_RANGE,
                defaults.sharpness,
            )?,
            blur: float("blur", &self.blur, BLUR_RANGE, defaults.blur)?,
            grayscale: flag("grayscale", &self.grayscale)?,
            invert: flag("invert", &self.invert)?,
            crop_square: flag("crop_square", &self.crop_square)?,
            format,
            quality,
        })
    }
}

/// Trimmed field text, or None when absent or blank.
fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_float(field: &'static str, text: &str) -> Result<f64, ParameterParseError> {
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(ParameterParseError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

fn parse_quality(text: &str) -> Result<u8, ParameterParseError> {
    let (lo, hi) = QUALITY_RANGE;
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v.clamp(lo as i64, hi as i64) as u8);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v.clamp(lo as f64, hi as f64) as u8),
        _ => Err(ParameterParseError::InvalidInteger {
            field: "quality",
            value: text.to_string(),
        }),
    }
}

fn parse_bool(field: &'static str, text: &str) -> Result<bool, ParameterParseError> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(ParameterParseError::InvalidBool {
            field,
            value: text.to_string(),
        }),
    }
}
