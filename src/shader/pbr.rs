//! Physically-based shaders.

use super::Shader;
use crate::geometry::Vertex;
use crate::light::Light;
use crate::material::{brdf, AlphaMode, PbrMaterial, SampledMaterial};
use crate::math::{Color, Matrix4, Vector3};
use crate::texture::Texture2D;
use std::sync::Arc;

fn apply_alpha_mode(color: Color, mode: AlphaMode, cutoff: f64) -> Option<Color> {
    match mode {
        AlphaMode::Opaque => Some(color.alpha(1.0)),
        AlphaMode::Mask => {
            if color.a < cutoff {
                None
            } else {
                Some(color.alpha(1.0))
            }
        }
        AlphaMode::Blend => Some(color),
    }
}

/// Cook-Torrance PBR shading of a sampled material under a light list.
pub struct PbrShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Shaded material.
    pub material: Arc<PbrMaterial>,
    /// Lights affecting the surface.
    pub lights: Vec<Light>,
    /// Legacy ambient color, used only when no ambient light is present.
    pub ambient_color: Color,
    /// Camera world position.
    pub camera_position: Vector3,
}

impl PbrShader {
    /// Create a PBR shader with the default dim ambient color.
    pub fn new(
        matrix: Matrix4,
        material: Arc<PbrMaterial>,
        lights: Vec<Light>,
        camera_position: Vector3,
    ) -> Self {
        Self {
            matrix,
            material,
            lights,
            ambient_color: Color::gray(0.1),
            camera_position,
        }
    }
}

impl Shader for PbrShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let sampled = self.material.sample(v.texcoord.x, v.texcoord.y);

        // The interpolated normal arrives unnormalized from the rasterizer.
        let world_normal = v.normal.normalized();
        let view_dir = (self.camera_position - v.position).normalized();

        let color = brdf::shade(
            &sampled,
            v.position,
            world_normal,
            view_dir,
            &self.lights,
            self.ambient_color,
        );

        apply_alpha_mode(color, self.material.alpha_mode, self.material.alpha_cutoff)
    }
}

/// Metallic-roughness PBR shading with explicit texture slots that
/// override the material's own bindings.
pub struct MetallicRoughnessShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Factor source; texture slots below take precedence over its own.
    pub material: Arc<PbrMaterial>,
    /// Lights affecting the surface.
    pub lights: Vec<Light>,
    /// Legacy ambient color, used only when no ambient light is present.
    pub ambient_color: Color,
    /// Camera world position.
    pub camera_position: Vector3,
    /// Base color texture slot.
    pub base_color_texture: Option<Arc<Texture2D>>,
    /// Combined metallic (B) / roughness (G) texture slot.
    pub metallic_roughness_texture: Option<Arc<Texture2D>>,
    /// Normal map slot.
    pub normal_texture: Option<Arc<Texture2D>>,
    /// Occlusion texture slot (R channel, applied directly).
    pub occlusion_texture: Option<Arc<Texture2D>>,
    /// Emissive texture slot.
    pub emissive_texture: Option<Arc<Texture2D>>,
}

impl MetallicRoughnessShader {
    /// Create a metallic-roughness shader with no textures bound.
    pub fn new(matrix: Matrix4, lights: Vec<Light>, camera_position: Vector3) -> Self {
        Self {
            matrix,
            material: Arc::new(PbrMaterial::new()),
            lights,
            ambient_color: Color::gray(0.1),
            camera_position,
            base_color_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
        }
    }
}

impl Shader for MetallicRoughnessShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let (tu, tv) = (v.texcoord.x, v.texcoord.y);

        let mut base_color = self.material.base_color_factor;
        if let Some(texture) = &self.base_color_texture {
            base_color = base_color.multiply(&texture.sample(tu, tv));
        }

        let mut metallic = self.material.metallic_factor;
        let mut roughness = self.material.roughness_factor;
        if let Some(texture) = &self.metallic_roughness_texture {
            let mr = texture.sample(tu, tv);
            metallic *= mr.b;
            roughness *= mr.g;
        }

        let mut normal = v.normal.normalized();
        if let Some(texture) = &self.normal_texture {
            let c = texture.sample(tu, tv);
            normal = Vector3::new(c.r * 2.0 - 1.0, c.g * 2.0 - 1.0, c.b * 2.0 - 1.0).normalized();
        }

        let mut occlusion = 1.0;
        if let Some(texture) = &self.occlusion_texture {
            occlusion = texture.sample(tu, tv).r;
        }

        let mut emissive = self.material.emissive_factor;
        if let Some(texture) = &self.emissive_texture {
            emissive = emissive.multiply(&texture.sample(tu, tv));
        }

        let sampled = SampledMaterial {
            base_color,
            metallic,
            roughness,
            normal,
            occlusion,
            emissive,
            ..SampledMaterial::default()
        };

        let view_dir = (self.camera_position - v.position).normalized();
        let color = brdf::shade(
            &sampled,
            v.position,
            normal,
            view_dir,
            &self.lights,
            self.ambient_color,
        );

        apply_alpha_mode(color, self.material.alpha_mode, self.material.alpha_cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on_vertex() -> Vertex {
        let mut v = Vertex::from_position(Vector3::ZERO);
        v.normal = Vector3::UNIT_Z;
        v
    }

    fn white_light() -> Vec<Light> {
        vec![Light::directional(
            Vector3::new(0.0, 0.0, -1.0),
            Color::WHITE,
            1.0,
        )]
    }

    #[test]
    fn test_opaque_forces_alpha_one() {
        let material = Arc::new(PbrMaterial::dielectric(
            Color::new(1.0, 1.0, 1.0, 0.4),
            0.5,
        ));
        let shader = PbrShader::new(
            Matrix4::IDENTITY,
            material,
            white_light(),
            Vector3::new(0.0, 0.0, 3.0),
        );
        let c = shader.fragment(&head_on_vertex()).unwrap();
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_mask_discards_below_cutoff() {
        let mut material = PbrMaterial::dielectric(Color::new(1.0, 1.0, 1.0, 0.4), 0.5);
        material.alpha_mode = AlphaMode::Mask;
        let shader = PbrShader::new(
            Matrix4::IDENTITY,
            Arc::new(material),
            white_light(),
            Vector3::new(0.0, 0.0, 3.0),
        );
        assert_eq!(shader.fragment(&head_on_vertex()), None);
    }

    #[test]
    fn test_mask_passes_above_cutoff() {
        let mut material = PbrMaterial::dielectric(Color::new(1.0, 1.0, 1.0, 0.6), 0.5);
        material.alpha_mode = AlphaMode::Mask;
        let shader = PbrShader::new(
            Matrix4::IDENTITY,
            Arc::new(material),
            white_light(),
            Vector3::new(0.0, 0.0, 3.0),
        );
        let c = shader.fragment(&head_on_vertex()).unwrap();
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_blend_preserves_alpha() {
        let mut material = PbrMaterial::dielectric(Color::new(1.0, 1.0, 1.0, 0.4), 0.5);
        material.alpha_mode = AlphaMode::Blend;
        let shader = PbrShader::new(
            Matrix4::IDENTITY,
            Arc::new(material),
            white_light(),
            Vector3::new(0.0, 0.0, 3.0),
        );
        let c = shader.fragment(&head_on_vertex()).unwrap();
        assert!((c.a - 0.4).abs() < 1e-12);
    }
}
