//! Output utilities.

mod image_io;

pub use image_io::{save_png, srgb_bytes, SaveError};
