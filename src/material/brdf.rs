//! Cook-Torrance microfacet BRDF evaluation.
//!
//! Free functions over value types: GGX normal distribution, Smith
//! geometry with Schlick-GGX lobes, and Schlick Fresnel.

use super::SampledMaterial;
use crate::light::Light;
use crate::math::{Color, Vector3};

/// Guard against division by zero in the specular denominator. Biases
/// energy slightly low at grazing angles; tune with care.
const DENOM_EPSILON: f64 = 1e-3;

/// GGX (Trowbridge-Reitz) normal distribution function.
/// `alpha` is roughness squared.
pub fn distribution_ggx(n_dot_h: f64, alpha: f64) -> f64 {
    let a2 = alpha * alpha;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (std::f64::consts::PI * d * d)
}

/// Schlick-GGX geometry term for a single direction, with
/// k = (alpha + 1)^2 / 8.
fn geometry_schlick_ggx(n_dot_x: f64, alpha: f64) -> f64 {
    let r = alpha + 1.0;
    let k = (r * r) / 8.0;
    n_dot_x / (n_dot_x * (1.0 - k) + k)
}

/// Smith geometry function: the product of the view and light lobes.
pub fn geometry_smith(n_dot_v: f64, n_dot_l: f64, alpha: f64) -> f64 {
    geometry_schlick_ggx(n_dot_v, alpha) * geometry_schlick_ggx(n_dot_l, alpha)
}

/// Schlick's approximation of the Fresnel reflectance.
pub fn fresnel_schlick(cos_theta: f64, f0: Vector3) -> Vector3 {
    let f = (1.0 - cos_theta).powi(5);
    f0 + (Vector3::ONE - f0) * f
}

/// Evaluate the full shading model for one fragment.
///
/// Starts from the emissive term, adds the legacy ambient color when the
/// light list carries no ambient light, then accumulates the contribution
/// of every light. The result's alpha is the sampled base-color alpha so
/// that alpha-mode handling downstream can observe it.
pub fn shade(
    material: &SampledMaterial,
    world_pos: Vector3,
    world_normal: Vector3,
    view_dir: Vector3,
    lights: &[Light],
    ambient_color: Color,
) -> Color {
    let alpha = material.roughness * material.roughness;

    // Base reflectance: dielectrics sit at 0.04, metals use the base color.
    let dielectric = Vector3::splat(0.04);
    let metal = Vector3::new(
        material.base_color.r,
        material.base_color.g,
        material.base_color.b,
    );
    let f0 = dielectric.lerp(&metal, material.metallic);

    let mut color = material.emissive * material.emissive_strength;

    let has_ambient_lights = lights.iter().any(Light::is_ambient);
    if !has_ambient_lights && (ambient_color.r > 0.0 || ambient_color.g > 0.0 || ambient_color.b > 0.0)
    {
        color += material.base_color.multiply(&ambient_color) * material.occlusion;
    }

    for light in lights {
        color += light_contribution(material, world_pos, world_normal, view_dir, light, f0, alpha);
    }

    color.alpha(material.base_color.a)
}

/// Contribution of a single light to a fragment.
fn light_contribution(
    material: &SampledMaterial,
    world_pos: Vector3,
    normal: Vector3,
    view_dir: Vector3,
    light: &Light,
    f0: Vector3,
    alpha: f64,
) -> Color {
    let (light_dir, light_color) = match *light {
        Light::Directional { direction, color, intensity } => {
            ((-direction).normalized(), color * intensity)
        }
        Light::Point { position, color, intensity, range } => {
            let to_light = position - world_pos;
            let distance = to_light.length();
            let attenuation = range_attenuation(distance, range);
            (to_light.normalized(), color * (intensity * attenuation))
        }
        Light::Spot {
            position,
            direction,
            color,
            intensity,
            range,
            inner_cone,
            outer_cone,
        } => {
            let to_light = position - world_pos;
            let distance = to_light.length();
            let light_dir = to_light.normalized();
            let mut attenuation = range_attenuation(distance, range);

            // Cone falloff: hard zero outside, full inside, linear ramp
            // between the cosines.
            let s = light_dir.dot(&(-direction));
            let inner_cos = inner_cone.cos();
            let outer_cos = outer_cone.cos();
            if s < outer_cos {
                attenuation = 0.0;
            } else if s <= inner_cos && inner_cos > outer_cos {
                attenuation *= (s - outer_cos) / (inner_cos - outer_cos);
            }

            (light_dir, color * (intensity * attenuation))
        }
        Light::Ambient { color, intensity } => {
            let contribution =
                material.base_color.multiply(&color) * (intensity * material.occlusion);
            return contribution.alpha(0.0);
        }
    };

    let n_dot_l = normal.dot(&light_dir).max(0.0);
    if n_dot_l <= 0.0 {
        return Color::TRANSPARENT;
    }

    let half = (light_dir + view_dir).normalized();
    let n_dot_v = normal.dot(&view_dir).max(0.0);
    let n_dot_h = normal.dot(&half).max(0.0);
    let v_dot_h = view_dir.dot(&half).max(0.0);

    let d = distribution_ggx(n_dot_h, alpha);
    let g = geometry_smith(n_dot_v, n_dot_l, alpha);
    let f = fresnel_schlick(v_dot_h, f0);

    let specular = d * g / (4.0 * n_dot_v * n_dot_l + DENOM_EPSILON);

    // Energy conservation: metals have no diffuse term.
    let k_s = f;
    let k_d = (Vector3::ONE - k_s) * (1.0 - material.metallic);

    let diffuse = Vector3::new(
        material.base_color.r,
        material.base_color.g,
        material.base_color.b,
    ) / std::f64::consts::PI;

    let brdf = k_d.multiply(&diffuse) + f * specular;
    let radiance = Vector3::new(light_color.r, light_color.g, light_color.b);
    let out = brdf.multiply(&radiance) * n_dot_l;

    Color::new(out.x, out.y, out.z, 0.0)
}

fn range_attenuation(distance: f64, range: f64) -> f64 {
    if range > 0.0 {
        let a = (1.0 - distance / range).max(0.0);
        a * a
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PbrMaterial;

    fn head_on_material(metallic: f64, roughness: f64) -> SampledMaterial {
        let mut m = PbrMaterial::new();
        m.metallic_factor = metallic;
        m.roughness_factor = roughness;
        m.sample(0.0, 0.0)
    }

    #[test]
    fn test_fresnel_limits() {
        let f0 = Vector3::splat(0.04);
        // Normal incidence returns F0.
        assert!(fresnel_schlick(1.0, f0).approx_eq(&f0, 1e-12));
        // Grazing incidence approaches 1.
        assert!(fresnel_schlick(0.0, f0).approx_eq(&Vector3::ONE, 1e-12));
    }

    #[test]
    fn test_ggx_hemisphere_integral() {
        // Numerically integrate D(h) (N.h) over the hemisphere; the NDF is
        // normalized so the integral is 1 (within quadrature error).
        let alpha = 0.5 * 0.5;
        let steps = 4096;
        let d_theta = std::f64::consts::FRAC_PI_2 / steps as f64;
        let mut integral = 0.0;
        for i in 0..steps {
            let theta = (i as f64 + 0.5) * d_theta;
            let n_dot_h = theta.cos();
            let d = distribution_ggx(n_dot_h, alpha);
            // dω = sin(θ) dθ dφ; D is φ-independent, so φ integrates to 2π.
            integral += d * n_dot_h * theta.sin() * d_theta * std::f64::consts::TAU;
        }
        assert!((integral - 1.0).abs() < 0.02, "integral = {}", integral);
    }

    #[test]
    fn test_directional_head_on() {
        let material = head_on_material(0.0, 0.5);
        let lights = [Light::directional(
            Vector3::new(0.0, 0.0, -1.0),
            Color::WHITE,
            1.0,
        )];
        let c = shade(
            &material,
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector3::UNIT_Z,
            &lights,
            Color::BLACK,
        );
        assert!(c.r > 0.3 && c.r < 1.0);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_light_behind_contributes_nothing() {
        let material = head_on_material(0.0, 0.5);
        let lights = [Light::directional(
            Vector3::new(0.0, 0.0, 1.0),
            Color::WHITE,
            1.0,
        )];
        let c = shade(
            &material,
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector3::UNIT_Z,
            &lights,
            Color::BLACK,
        );
        assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_point_light_at_range_is_zero() {
        let material = head_on_material(0.0, 0.5);
        let lights = [Light::point(
            Vector3::new(0.0, 0.0, 5.0),
            Color::WHITE,
            1.0,
            5.0,
        )];
        let c = shade(
            &material,
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector3::UNIT_Z,
            &lights,
            Color::BLACK,
        );
        assert!(c.r.abs() < 1e-12);
    }

    #[test]
    fn test_spot_hard_edge_when_cones_equal() {
        let material = head_on_material(0.0, 0.5);
        let angle = 0.3_f64;
        let spot = |target_offset: f64| {
            let lights = [Light::spot(
                Vector3::new(0.0, 0.0, 5.0),
                Vector3::new(0.0, 0.0, -1.0),
                Color::WHITE,
                1.0,
                0.0,
                angle,
                angle,
            )];
            shade(
                &material,
                Vector3::new(target_offset, 0.0, 0.0),
                Vector3::UNIT_Z,
                Vector3::UNIT_Z,
                &lights,
                Color::BLACK,
            )
        };
        // Just inside the cone versus just outside: step falloff.
        let inside = spot(5.0 * (angle - 0.01).tan());
        let outside = spot(5.0 * (angle + 0.01).tan());
        assert!(inside.r > 0.0);
        assert_eq!(outside.r, 0.0);
    }

    #[test]
    fn test_ambient_light_suppresses_legacy_ambient() {
        let material = head_on_material(0.0, 1.0);
        let legacy = Color::new(0.5, 0.5, 0.5, 1.0);
        let without = shade(
            &material,
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector3::UNIT_Z,
            &[],
            legacy,
        );
        assert!((without.r - 0.5).abs() < 1e-12);
        let with = shade(
            &material,
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector3::UNIT_Z,
            &[Light::ambient(Color::new(0.1, 0.1, 0.1, 1.0), 1.0)],
            legacy,
        );
        assert!((with.r - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_metal_tints_specular() {
        // A red metal reflects only red head-on (F = F0 = base color); a
        // red dielectric leaks an untinted 4% specular into green and blue.
        let red = |metallic: f64| {
            let mut m = PbrMaterial::metal(Color::RED, 0.5);
            m.metallic_factor = metallic;
            m.sample(0.0, 0.0)
        };
        let light = [Light::directional(
            Vector3::new(0.0, 0.0, -1.0),
            Color::WHITE,
            1.0,
        )];
        let metal = shade(&red(1.0), Vector3::ZERO, Vector3::UNIT_Z, Vector3::UNIT_Z, &light, Color::BLACK);
        let dielectric = shade(&red(0.0), Vector3::ZERO, Vector3::UNIT_Z, Vector3::UNIT_Z, &light, Color::BLACK);
        assert!(metal.g.abs() < 1e-9);
        assert!(dielectric.g > 0.0);
        assert!(metal.r > 0.0);
    }
}
