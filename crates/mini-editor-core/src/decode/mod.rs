//! Image decoding for the Mini Editor.
//!
//! Uploaded bytes are sniffed and decoded with the `image` crate, then
//! widened to 8-bit RGBA. That widening is the first, unconditional step
//! of every render: from here on each stage can assume four channels.
//!
//! # Examples
//!
//! ```ignore
//! use mini_editor_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, DecodedImage, CHANNELS};
