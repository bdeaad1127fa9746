//! Geometric operations: square padding, mirroring, rotation and scaling.
//!
//! # Transform Order
//!
//! Within a render, geometry is applied in this order before any tone or
//! color work:
//! 1. Square padding
//! 2. Horizontal mirror
//! 3. Vertical flip
//! 4. Rotation (with canvas expansion)
//! 5. Uniform scale
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Origin is top-left corner, y grows downwards

mod error;
mod flip;
mod pad;
mod rotation;
mod scale;

pub use error::TransformError;
pub use flip::{flip_horizontal, flip_vertical};
pub use pad::{pad_to_square, square_placement};
pub use rotation::{apply_rotation, compute_rotated_bounds, ROTATE_FILTER};
pub use scale::{apply_scale, compute_scaled_dimensions, SCALE_FILTER};
