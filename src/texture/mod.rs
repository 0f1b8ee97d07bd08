//! Texture containers and sampling.

mod cube;
mod texture2d;
mod uv_modifier;

pub use cube::{CubeFace, CubeTexture};
pub use texture2d::{wrap, FilterMode, Texture2D, WrapMode};
pub use uv_modifier::{UvBlendMode, UvMapping, UvMask, UvModifier, UvRegion, UvTransform};
