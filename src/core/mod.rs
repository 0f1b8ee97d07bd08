//! Rasterization core: framebuffer, render context, and scene renderer.

mod context;
mod framebuffer;
mod renderer;

pub use context::RenderContext;
pub use framebuffer::{Framebuffer, RenderError};
pub use renderer::{RenderStats, SceneRenderer};
