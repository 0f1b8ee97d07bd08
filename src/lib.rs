//! # Softren - CPU Software 3D Renderer
//!
//! Softren is a CPU-only renderer that ingests glTF 2.0 scenes and
//! produces deterministic raster images, with no GPU assistance. It
//! pairs a software rasterization pipeline (homogeneous clipping,
//! perspective-correct interpolation, depth testing) with a
//! Cook-Torrance physically-based shading model.
//!
//! ## Features
//!
//! - **Math**: f64 vectors, matrices, boxes, planes, and frustum culling
//! - **Geometry**: triangle meshes with normal smoothing, splitting, and
//!   procedural primitives
//! - **Texturing**: wrap/filter modes, mipmap chains, cube maps, and a
//!   layered UV modifier
//! - **Shading**: a vertex/fragment shader contract with solid, textured,
//!   Phong, PBR, environment, and shadow-mapping built-ins
//! - **Scene**: a hierarchical scene graph with named resource
//!   catalogues, lights, and cameras
//!
//! ## Example
//!
//! ```no_run
//! use softren::prelude::*;
//!
//! let scene = Scene::load_gltf("model.gltf")?;
//! let mut ctx = RenderContext::new(1024, 768)?;
//! ctx.clear_color(Color::BLACK);
//! scene.render_to(&mut ctx);
//! save_png("out.png", ctx.image())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod camera;
pub mod core;
pub mod geometry;
pub mod light;
pub mod loaders;
pub mod material;
pub mod math;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod util;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::camera::*;
    pub use crate::core::*;
    pub use crate::geometry::*;
    pub use crate::light::*;
    pub use crate::loaders::{load_texture, LoadError};
    pub use crate::material::*;
    pub use crate::math::*;
    pub use crate::scene::*;
    pub use crate::shader::*;
    pub use crate::texture::*;
    pub use crate::util::{save_png, SaveError};
}
