//! Shader contract and built-in shaders.

mod environment;
mod phong;
mod pbr;
mod shadow;

pub use environment::EnvironmentShader;
pub use phong::PhongShader;
pub use pbr::{MetallicRoughnessShader, PbrShader};
pub use shadow::{
    directional_light_matrix, ShadowMap, ShadowMapShader, ShadowReceiverShader,
};

use crate::geometry::Vertex;
use crate::math::{Color, Matrix4};
use crate::texture::Texture2D;
use std::sync::Arc;

/// The programmable stages of the pipeline.
///
/// `vertex` computes the clip-space `output` of a vertex (and may adjust
/// other attributes); it must not change triangle topology. `fragment` is
/// called once per covered pixel with perspective-correct interpolated
/// attributes and returns the fragment color, or `None` to discard.
pub trait Shader {
    /// Transform one vertex into clip space.
    fn vertex(&self, v: &Vertex) -> Vertex;

    /// Shade one fragment. `None` discards it.
    fn fragment(&self, v: &Vertex) -> Option<Color>;
}

/// Renders every fragment with a single solid color.
pub struct SolidColorShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Output color.
    pub color: Color,
}

impl SolidColorShader {
    /// Create a solid-color shader.
    pub fn new(matrix: Matrix4, color: Color) -> Self {
        Self { matrix, color }
    }
}

impl Shader for SolidColorShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, _v: &Vertex) -> Option<Color> {
        Some(self.color)
    }
}

/// Renders with a texture and no lighting.
pub struct TextureShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Sampled texture.
    pub texture: Arc<Texture2D>,
}

impl TextureShader {
    /// Create a textured-unlit shader.
    pub fn new(matrix: Matrix4, texture: Arc<Texture2D>) -> Self {
        Self { matrix, texture }
    }
}

impl Shader for TextureShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        Some(self.texture.bilinear_sample(v.texcoord.x, v.texcoord.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_solid_color_vertex_stage() {
        let shader = SolidColorShader::new(
            Matrix4::translation(Vector3::new(0.0, 0.0, -2.0)),
            Color::RED,
        );
        let v = shader.vertex(&Vertex::from_position(Vector3::ZERO));
        assert_eq!(v.output.z, -2.0);
        assert_eq!(v.output.w, 1.0);
        assert_eq!(shader.fragment(&v), Some(Color::RED));
    }
}
