//! PBR material attribute bundle and per-fragment sampling.

use crate::math::{Color, Vector3};
use crate::texture::Texture2D;
use std::sync::Arc;

/// How the alpha channel is interpreted when shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Fully opaque; alpha is forced to 1.
    #[default]
    Opaque,
    /// Alpha testing: fragments below the cutoff are discarded, the rest
    /// are opaque.
    Mask,
    /// Alpha is preserved for blending.
    Blend,
}

/// Material authoring workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workflow {
    /// Metallic-roughness (the glTF 2.0 core model).
    #[default]
    MetallicRoughness,
    /// Specular-glossiness (legacy).
    SpecularGlossiness,
}

/// A physically-based material.
///
/// Each numeric attribute is a factor, optionally multiplied by a sample
/// from a bound texture in a documented channel (metallic from B and
/// roughness from G of the combined metallic-roughness texture, occlusion
/// from R, transmission from R, thickness from G).
#[derive(Debug, Clone)]
pub struct PbrMaterial {
    /// Base color factor.
    pub base_color_factor: Color,
    /// Base color texture, multiplied into the factor.
    pub base_color_texture: Option<Arc<Texture2D>>,

    /// Metallic factor (0 = dielectric, 1 = metal).
    pub metallic_factor: f64,
    /// Roughness factor (0 = smooth, 1 = rough).
    pub roughness_factor: f64,
    /// Combined metallic (B) / roughness (G) texture.
    pub metallic_roughness_texture: Option<Arc<Texture2D>>,

    /// Tangent-space normal map.
    pub normal_texture: Option<Arc<Texture2D>>,
    /// Scale applied to the x/y components of decoded normals.
    pub normal_scale: f64,

    /// Ambient occlusion texture (R channel).
    pub occlusion_texture: Option<Arc<Texture2D>>,
    /// Occlusion strength: occlusion = 1 - (1 - sample) * strength.
    pub occlusion_strength: f64,

    /// Emissive color factor.
    pub emissive_factor: Color,
    /// Emissive texture, multiplied into the factor.
    pub emissive_texture: Option<Arc<Texture2D>>,
    /// Emissive strength multiplier.
    pub emissive_strength: f64,

    /// Index of refraction.
    pub ior: f64,

    /// Specular color factor.
    pub specular_color_factor: Color,
    /// Specular color texture.
    pub specular_color_texture: Option<Arc<Texture2D>>,

    /// Transmission factor (0 = opaque).
    pub transmission_factor: f64,
    /// Transmission texture (R channel).
    pub transmission_texture: Option<Arc<Texture2D>>,

    /// Volume thickness factor.
    pub thickness_factor: f64,
    /// Thickness texture (G channel).
    pub thickness_texture: Option<Arc<Texture2D>>,
    /// Distance at which light is attenuated to the attenuation color.
    pub attenuation_distance: f64,
    /// Attenuation color of the volume.
    pub attenuation_color: Color,

    /// Anisotropy strength.
    pub anisotropy_strength: f64,
    /// Anisotropy rotation in radians.
    pub anisotropy_rotation: f64,
    /// Anisotropy texture (strength from R, rotation offset from G).
    pub anisotropy_texture: Option<Arc<Texture2D>>,

    /// Sheen color factor.
    pub sheen_color_factor: Color,
    /// Sheen roughness factor.
    pub sheen_roughness_factor: f64,
    /// Sheen color texture.
    pub sheen_color_texture: Option<Arc<Texture2D>>,
    /// Sheen roughness texture (A channel).
    pub sheen_roughness_texture: Option<Arc<Texture2D>>,

    /// Iridescence factor.
    pub iridescence_factor: f64,
    /// Iridescence index of refraction.
    pub iridescence_ior: f64,
    /// Minimum iridescence thin-film thickness, in nanometers.
    pub iridescence_thickness_min: f64,
    /// Maximum iridescence thin-film thickness, in nanometers.
    pub iridescence_thickness_max: f64,
    /// Iridescence texture (R channel).
    pub iridescence_texture: Option<Arc<Texture2D>>,
    /// Iridescence thickness texture (G channel).
    pub iridescence_thickness_texture: Option<Arc<Texture2D>>,

    /// Dispersion factor.
    pub dispersion_factor: f64,

    /// Clearcoat layer factor.
    pub clearcoat_factor: f64,
    /// Clearcoat roughness factor.
    pub clearcoat_roughness_factor: f64,
    /// Clearcoat texture (R channel).
    pub clearcoat_texture: Option<Arc<Texture2D>>,
    /// Clearcoat roughness texture (G channel).
    pub clearcoat_roughness_texture: Option<Arc<Texture2D>>,
    /// Clearcoat normal map.
    pub clearcoat_normal_texture: Option<Arc<Texture2D>>,

    /// Alpha cutoff for [`AlphaMode::Mask`].
    pub alpha_cutoff: f64,
    /// Alpha interpretation.
    pub alpha_mode: AlphaMode,
    /// Whether back faces are shaded too.
    pub double_sided: bool,
    /// Authoring workflow.
    pub workflow: Workflow,
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self {
            base_color_factor: Color::WHITE,
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            normal_scale: 1.0,
            occlusion_texture: None,
            occlusion_strength: 1.0,
            emissive_factor: Color::BLACK,
            emissive_texture: None,
            emissive_strength: 1.0,
            ior: 1.5,
            specular_color_factor: Color::WHITE,
            specular_color_texture: None,
            transmission_factor: 0.0,
            transmission_texture: None,
            thickness_factor: 0.0,
            thickness_texture: None,
            attenuation_distance: f64::INFINITY,
            attenuation_color: Color::WHITE,
            anisotropy_strength: 0.0,
            anisotropy_rotation: 0.0,
            anisotropy_texture: None,
            sheen_color_factor: Color::BLACK,
            sheen_roughness_factor: 0.0,
            sheen_color_texture: None,
            sheen_roughness_texture: None,
            iridescence_factor: 0.0,
            iridescence_ior: 1.3,
            iridescence_thickness_min: 100.0,
            iridescence_thickness_max: 400.0,
            iridescence_texture: None,
            iridescence_thickness_texture: None,
            dispersion_factor: 0.0,
            clearcoat_factor: 0.0,
            clearcoat_roughness_factor: 0.0,
            clearcoat_texture: None,
            clearcoat_roughness_texture: None,
            clearcoat_normal_texture: None,
            alpha_cutoff: 0.5,
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
            workflow: Workflow::MetallicRoughness,
        }
    }
}

impl PbrMaterial {
    /// Create a material with physically sensible defaults: white base
    /// color, metallic 1, roughness 1, IOR 1.5, opaque, single-sided.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a colored metal.
    pub fn metal(base_color: Color, roughness: f64) -> Self {
        Self {
            base_color_factor: base_color,
            metallic_factor: 1.0,
            roughness_factor: roughness,
            ..Self::default()
        }
    }

    /// Create a colored dielectric.
    pub fn dielectric(base_color: Color, roughness: f64) -> Self {
        Self {
            base_color_factor: base_color,
            metallic_factor: 0.0,
            roughness_factor: roughness,
            ..Self::default()
        }
    }

    /// Sample every material attribute at a texture coordinate, composing
    /// factor and texture per channel.
    pub fn sample(&self, u: f64, v: f64) -> SampledMaterial {
        let mut base_color = self.base_color_factor;
        if let Some(texture) = &self.base_color_texture {
            base_color = base_color.multiply(&texture.bilinear_sample(u, v));
        }

        let mut metallic = self.metallic_factor;
        let mut roughness = self.roughness_factor;
        if let Some(texture) = &self.metallic_roughness_texture {
            let mr = texture.bilinear_sample(u, v);
            metallic *= mr.b;
            roughness *= mr.g;
        }

        // Tangent-space normal: decoded from [0, 1] to [-1, 1] with x/y
        // scaled, z left unscaled.
        let mut normal = Vector3::UNIT_Z;
        if let Some(texture) = &self.normal_texture {
            let c = texture.bilinear_sample(u, v);
            normal = Vector3::new(
                (c.r * 2.0 - 1.0) * self.normal_scale,
                (c.g * 2.0 - 1.0) * self.normal_scale,
                c.b * 2.0 - 1.0,
            )
            .normalized();
        }

        let mut occlusion = 1.0;
        if let Some(texture) = &self.occlusion_texture {
            let c = texture.bilinear_sample(u, v);
            occlusion = 1.0 - (1.0 - c.r) * self.occlusion_strength;
        }

        let mut emissive = self.emissive_factor;
        if let Some(texture) = &self.emissive_texture {
            emissive = emissive.multiply(&texture.bilinear_sample(u, v));
        }

        let mut specular_color = self.specular_color_factor;
        if let Some(texture) = &self.specular_color_texture {
            specular_color = specular_color.multiply(&texture.bilinear_sample(u, v));
        }

        let mut transmission = self.transmission_factor;
        if let Some(texture) = &self.transmission_texture {
            transmission *= texture.bilinear_sample(u, v).r;
        }

        let mut thickness = self.thickness_factor;
        if let Some(texture) = &self.thickness_texture {
            thickness *= texture.bilinear_sample(u, v).g;
        }

        let mut anisotropy_strength = self.anisotropy_strength;
        let mut anisotropy_rotation = self.anisotropy_rotation;
        if let Some(texture) = &self.anisotropy_texture {
            let c = texture.bilinear_sample(u, v);
            anisotropy_strength *= c.r;
            anisotropy_rotation += (c.g * 2.0 - 1.0) * std::f64::consts::PI;
        }

        let mut sheen_color = self.sheen_color_factor;
        if let Some(texture) = &self.sheen_color_texture {
            sheen_color = sheen_color.multiply(&texture.bilinear_sample(u, v));
        }
        let mut sheen_roughness = self.sheen_roughness_factor;
        if let Some(texture) = &self.sheen_roughness_texture {
            sheen_roughness *= texture.bilinear_sample(u, v).a;
        }

        let mut iridescence = self.iridescence_factor;
        if let Some(texture) = &self.iridescence_texture {
            iridescence *= texture.bilinear_sample(u, v).r;
        }
        let thickness_range = self.iridescence_thickness_max - self.iridescence_thickness_min;
        let mut iridescence_thickness = self.iridescence_thickness_min;
        if let Some(texture) = &self.iridescence_thickness_texture {
            iridescence_thickness += texture.bilinear_sample(u, v).g * thickness_range;
        } else {
            iridescence_thickness += thickness_range * 0.5;
        }

        let mut clearcoat = self.clearcoat_factor;
        if let Some(texture) = &self.clearcoat_texture {
            clearcoat *= texture.bilinear_sample(u, v).r;
        }
        let mut clearcoat_roughness = self.clearcoat_roughness_factor;
        if let Some(texture) = &self.clearcoat_roughness_texture {
            clearcoat_roughness *= texture.bilinear_sample(u, v).g;
        }
        let mut clearcoat_normal = Vector3::UNIT_Z;
        if let Some(texture) = &self.clearcoat_normal_texture {
            let c = texture.bilinear_sample(u, v);
            clearcoat_normal =
                Vector3::new(c.r * 2.0 - 1.0, c.g * 2.0 - 1.0, c.b * 2.0 - 1.0).normalized();
        }

        SampledMaterial {
            base_color,
            metallic,
            roughness,
            normal,
            occlusion,
            emissive,
            emissive_strength: self.emissive_strength,
            ior: self.ior,
            specular_color,
            transmission,
            thickness,
            attenuation_color: self.attenuation_color,
            attenuation_distance: self.attenuation_distance,
            anisotropy_strength,
            anisotropy_rotation,
            sheen_color,
            sheen_roughness,
            iridescence,
            iridescence_ior: self.iridescence_ior,
            iridescence_thickness,
            dispersion: self.dispersion_factor,
            clearcoat,
            clearcoat_roughness,
            clearcoat_normal,
        }
    }
}

/// A snapshot of material attributes sampled at one texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledMaterial {
    /// Sampled base color.
    pub base_color: Color,
    /// Sampled metallic value.
    pub metallic: f64,
    /// Sampled roughness value.
    pub roughness: f64,
    /// Tangent-space normal.
    pub normal: Vector3,
    /// Ambient occlusion multiplier.
    pub occlusion: f64,
    /// Sampled emissive color.
    pub emissive: Color,
    /// Emissive strength multiplier.
    pub emissive_strength: f64,
    /// Index of refraction.
    pub ior: f64,
    /// Sampled specular color.
    pub specular_color: Color,
    /// Transmission amount.
    pub transmission: f64,
    /// Volume thickness.
    pub thickness: f64,
    /// Volume attenuation color.
    pub attenuation_color: Color,
    /// Volume attenuation distance.
    pub attenuation_distance: f64,
    /// Anisotropy strength.
    pub anisotropy_strength: f64,
    /// Anisotropy rotation in radians.
    pub anisotropy_rotation: f64,
    /// Sheen color.
    pub sheen_color: Color,
    /// Sheen roughness.
    pub sheen_roughness: f64,
    /// Iridescence amount.
    pub iridescence: f64,
    /// Iridescence index of refraction.
    pub iridescence_ior: f64,
    /// Iridescence thin-film thickness in nanometers.
    pub iridescence_thickness: f64,
    /// Dispersion amount.
    pub dispersion: f64,
    /// Clearcoat amount.
    pub clearcoat: f64,
    /// Clearcoat roughness.
    pub clearcoat_roughness: f64,
    /// Clearcoat tangent-space normal.
    pub clearcoat_normal: Vector3,
}

impl Default for SampledMaterial {
    fn default() -> Self {
        PbrMaterial::default().sample(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let m = PbrMaterial::new();
        assert_eq!(m.base_color_factor, Color::WHITE);
        assert_eq!(m.metallic_factor, 1.0);
        assert_eq!(m.roughness_factor, 1.0);
        assert_eq!(m.ior, 1.5);
        assert_eq!(m.alpha_mode, AlphaMode::Opaque);
        assert!(!m.double_sided);
        assert_eq!(m.workflow, Workflow::MetallicRoughness);
    }

    #[test]
    fn test_sample_factors_only() {
        let m = PbrMaterial::dielectric(Color::new(0.5, 0.25, 1.0, 1.0), 0.3);
        let s = m.sample(0.5, 0.5);
        assert_eq!(s.base_color, Color::new(0.5, 0.25, 1.0, 1.0));
        assert_eq!(s.metallic, 0.0);
        assert_eq!(s.roughness, 0.3);
        assert_eq!(s.normal, Vector3::UNIT_Z);
        assert_eq!(s.occlusion, 1.0);
    }

    #[test]
    fn test_metallic_roughness_channels() {
        let texture = Texture2D::solid(2, 2, Color::new(0.0, 0.5, 0.25, 1.0)).unwrap();
        let m = PbrMaterial {
            metallic_roughness_texture: Some(Arc::new(texture)),
            ..PbrMaterial::default()
        };
        let s = m.sample(0.5, 0.5);
        // Metallic reads B, roughness reads G.
        assert!((s.metallic - 0.25).abs() < 0.01);
        assert!((s.roughness - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_occlusion_strength_remap() {
        let texture = Texture2D::solid(2, 2, Color::new(0.5, 0.5, 0.5, 1.0)).unwrap();
        let m = PbrMaterial {
            occlusion_texture: Some(Arc::new(texture)),
            occlusion_strength: 0.5,
            ..PbrMaterial::default()
        };
        let s = m.sample(0.5, 0.5);
        // 1 - (1 - 0.5) * 0.5 = 0.75
        assert!((s.occlusion - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_normal_map_decode() {
        // Flat normal map (0.5, 0.5, 1) decodes to +Z.
        let texture = Texture2D::solid(2, 2, Color::new(0.5, 0.5, 1.0, 1.0)).unwrap();
        let m = PbrMaterial {
            normal_texture: Some(Arc::new(texture)),
            ..PbrMaterial::default()
        };
        let s = m.sample(0.5, 0.5);
        assert!(s.normal.approx_eq(&Vector3::UNIT_Z, 0.01));
    }
}
