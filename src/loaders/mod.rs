//! Asset loading: glTF scenes, image textures, and KTX2 containers.

mod gltf_loader;
mod ktx2;

pub use ktx2::{is_ktx2, load_ktx2, load_ktx2_file};

use crate::core::RenderError;
use crate::texture::Texture2D;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced while loading assets. I/O and format errors from the
/// underlying parsers are re-raised unchanged in the message.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The file did not parse as its declared format.
    #[error("parse error: {0}")]
    Parse(String),
    /// An embedded or referenced image failed to decode.
    #[error("image decode error: {0}")]
    Decode(String),
    /// The file is valid but uses a feature this loader does not handle.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<gltf::Error> for LoadError {
    fn from(e: gltf::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<RenderError> for LoadError {
    fn from(e: RenderError) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Decode a PNG or JPEG file into a texture.
pub fn load_texture(path: impl AsRef<Path>) -> Result<Texture2D, LoadError> {
    let image = image::open(path.as_ref()).map_err(|e| LoadError::Decode(e.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Texture2D::new(
        width as usize,
        height as usize,
        rgba.into_raw(),
    )?)
}
