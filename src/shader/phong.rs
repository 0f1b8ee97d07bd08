//! Phong shading with an optional texture.

use super::Shader;
use crate::geometry::Vertex;
use crate::math::{Color, Matrix4, Vector3};
use crate::texture::Texture2D;
use std::sync::Arc;

/// Ambient + diffuse + specular shading against one directional light.
pub struct PhongShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Unit direction from the surface toward the light.
    pub light_direction: Vector3,
    /// Camera world position, for the specular term.
    pub camera_position: Vector3,
    /// Flat object color. `None` uses the interpolated vertex color.
    pub object_color: Option<Color>,
    /// Ambient light color.
    pub ambient_color: Color,
    /// Diffuse light color.
    pub diffuse_color: Color,
    /// Specular light color.
    pub specular_color: Color,
    /// Optional texture; overrides object and vertex color.
    pub texture: Option<Arc<Texture2D>>,
    /// Specular exponent; 0 disables the specular term.
    pub specular_power: f64,
}

impl PhongShader {
    /// Create a Phong shader with the conventional light levels
    /// (0.2 ambient, 0.8 diffuse, white specular, exponent 32).
    pub fn new(matrix: Matrix4, light_direction: Vector3, camera_position: Vector3) -> Self {
        Self {
            matrix,
            light_direction: light_direction.normalized(),
            camera_position,
            object_color: None,
            ambient_color: Color::gray(0.2),
            diffuse_color: Color::gray(0.8),
            specular_color: Color::WHITE,
            texture: None,
            specular_power: 32.0,
        }
    }
}

impl Shader for PhongShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let mut light = self.ambient_color;
        let mut color = self.object_color.unwrap_or(v.color);
        if let Some(texture) = &self.texture {
            color = texture.bilinear_sample(v.texcoord.x, v.texcoord.y);
        }

        let diffuse = v.normal.dot(&self.light_direction).max(0.0);
        light += self.diffuse_color * diffuse;

        if diffuse > 0.0 && self.specular_power > 0.0 {
            let camera = (self.camera_position - v.position).normalized();
            let reflected = (-self.light_direction).reflect(&v.normal);
            let specular = camera.dot(&reflected).max(0.0);
            if specular > 0.0 {
                light += self.specular_color * specular.powf(self.specular_power);
            }
        }

        Some(color.multiply(&light).min(&Color::WHITE).alpha(color.a))
    }
}
