//! Environment (cube map) reflection shading.

use super::Shader;
use crate::geometry::Vertex;
use crate::math::{Color, Matrix4, Vector3};
use crate::texture::CubeTexture;
use std::sync::Arc;

/// Mirror-reflects the view direction off the surface and samples a cube
/// map.
pub struct EnvironmentShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Environment cube map.
    pub cube_map: Arc<CubeTexture>,
    /// Camera world position.
    pub camera_position: Vector3,
    /// Multiplier on the sampled reflection.
    pub reflectance: f64,
}

impl EnvironmentShader {
    /// Create an environment shader with full reflectance.
    pub fn new(matrix: Matrix4, cube_map: Arc<CubeTexture>, camera_position: Vector3) -> Self {
        Self {
            matrix,
            cube_map,
            camera_position,
            reflectance: 1.0,
        }
    }
}

impl Shader for EnvironmentShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let view_dir = (self.camera_position - v.position).normalized();
        let reflection = view_dir.reflect(&v.normal.normalized());
        Some(self.cube_map.sample(&reflection) * self.reflectance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture2D;

    #[test]
    fn test_head_on_reflection_samples_behind() {
        // Looking straight at a +z-facing surface, the mirrored view
        // direction points at the -z face.
        let faces = [
            Color::RED,
            Color::GREEN,
            Color::BLUE,
            Color::new(1.0, 1.0, 0.0, 1.0),
            Color::new(0.0, 1.0, 1.0, 1.0),
            Color::new(1.0, 0.0, 1.0, 1.0),
        ]
        .map(|c| Texture2D::solid(2, 2, c).unwrap());
        let shader = EnvironmentShader::new(
            Matrix4::IDENTITY,
            Arc::new(CubeTexture::new(faces)),
            Vector3::new(0.0, 0.0, 5.0),
        );
        let mut v = Vertex::from_position(Vector3::ZERO);
        v.normal = Vector3::UNIT_Z;
        let c = shader.fragment(&v).unwrap();
        assert!(c.approx_eq(&Color::new(1.0, 0.0, 1.0, 1.0), 1e-2));
    }
}
