//! Shadow mapping: depth writer, shadow map storage, and a PCF receiver.

use super::Shader;
use crate::core::Framebuffer;
use crate::geometry::Vertex;
use crate::math::{Box3, Color, Matrix4, Vector3};
use crate::texture::Texture2D;
use std::sync::Arc;

/// A light-space depth grid captured from a depth-only render.
#[derive(Debug, Clone)]
pub struct ShadowMap {
    width: usize,
    height: usize,
    depth: Vec<f64>,
}

impl ShadowMap {
    /// Create a shadow map cleared to the maximum depth.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f64::MAX; width * height],
        }
    }

    /// Copy the depth plane of a framebuffer (typically after a render
    /// with color writes disabled).
    pub fn from_framebuffer(fb: &Framebuffer) -> Self {
        Self {
            width: fb.width(),
            height: fb.height(),
            depth: fb.depth_plane().to_vec(),
        }
    }

    /// Shadow map width in texels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Shadow map height in texels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every texel to the given depth.
    pub fn clear(&mut self, depth: f64) {
        self.depth.fill(depth);
    }

    /// Depth at a texel; out-of-bounds reads return the maximum depth
    /// (never in shadow).
    pub fn depth(&self, x: i64, y: i64) -> f64 {
        if x < 0 || x >= self.width as i64 || y < 0 || y >= self.height as i64 {
            return f64::MAX;
        }
        self.depth[y as usize * self.width + x as usize]
    }

    /// Write the depth of a texel; out-of-bounds writes are ignored.
    pub fn set_depth(&mut self, x: i64, y: i64, depth: f64) {
        if x < 0 || x >= self.width as i64 || y < 0 || y >= self.height as i64 {
            return;
        }
        self.depth[y as usize * self.width + x as usize] = depth;
    }
}

/// Depth-only shader for shadow-map generation. The fragment color is the
/// fragment's own depth as grayscale; when rendering with color writes
/// disabled only the depth plane matters.
pub struct ShadowMapShader {
    /// Light-space view-projection matrix.
    pub matrix: Matrix4,
}

impl ShadowMapShader {
    /// Create a shadow-map writer.
    pub fn new(matrix: Matrix4) -> Self {
        Self { matrix }
    }
}

impl Shader for ShadowMapShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let depth = v.output.z / v.output.w * 0.5 + 0.5;
        Some(Color::gray(depth))
    }
}

/// Phong shading dimmed by a shadow-map lookup with percentage-closer
/// filtering.
pub struct ShadowReceiverShader {
    /// Combined model-view-projection matrix.
    pub matrix: Matrix4,
    /// Light-space view-projection matrix used when the map was rendered.
    pub light_matrix: Matrix4,
    /// Unit direction from the surface toward the light.
    pub light_direction: Vector3,
    /// Camera world position.
    pub camera_position: Vector3,
    /// Flat object color.
    pub object_color: Color,
    /// Optional texture; overrides the object color.
    pub texture: Option<Arc<Texture2D>>,
    /// Shadow map sampled for occlusion.
    pub shadow_map: Arc<ShadowMap>,
    /// Depth bias subtracted before comparison, against acne.
    pub shadow_bias: f64,
    /// How dark a fully shadowed fragment becomes (0 = no effect,
    /// 1 = black).
    pub shadow_strength: f64,
    /// PCF kernel half-size; 0 disables filtering.
    pub pcf_size: i64,
}

impl ShadowReceiverShader {
    /// Create a shadow receiver with a 2-texel PCF kernel.
    pub fn new(
        matrix: Matrix4,
        light_matrix: Matrix4,
        light_direction: Vector3,
        camera_position: Vector3,
        shadow_map: Arc<ShadowMap>,
    ) -> Self {
        Self {
            matrix,
            light_matrix,
            light_direction: light_direction.normalized(),
            camera_position,
            object_color: Color::gray(0.8),
            texture: None,
            shadow_map,
            shadow_bias: 0.005,
            shadow_strength: 0.7,
            pcf_size: 2,
        }
    }

    /// Shadow factor for a fragment: 0 fully lit, 1 fully shadowed.
    fn shadow_factor(&self, v: &Vertex) -> f64 {
        let clip = self.light_matrix.mul_position_w(&v.position);
        if clip.w == 0.0 {
            return 0.0;
        }
        let ndc = clip.perspective_divide();

        // Same mapping the rasterizer's screen matrix applies, so depths
        // compare against the captured depth plane.
        let x = ((ndc.x * 0.5 + 0.5) * self.shadow_map.width() as f64) as i64;
        let y = ((-ndc.y * 0.5 + 0.5) * self.shadow_map.height() as f64) as i64;
        let current = ndc.z * 0.5 + 0.5 - self.shadow_bias;

        if self.pcf_size > 0 {
            let mut shadow = 0.0;
            let mut samples = 0.0;
            for dx in -self.pcf_size..=self.pcf_size {
                for dy in -self.pcf_size..=self.pcf_size {
                    if current > self.shadow_map.depth(x + dx, y + dy) {
                        shadow += 1.0;
                    }
                    samples += 1.0;
                }
            }
            shadow / samples
        } else if current > self.shadow_map.depth(x, y) {
            1.0
        } else {
            0.0
        }
    }
}

impl Shader for ShadowReceiverShader {
    fn vertex(&self, v: &Vertex) -> Vertex {
        let mut v = *v;
        v.output = self.matrix.mul_position_w(&v.position);
        v
    }

    fn fragment(&self, v: &Vertex) -> Option<Color> {
        let mut color = self.object_color;
        if let Some(texture) = &self.texture {
            color = texture.bilinear_sample(v.texcoord.x, v.texcoord.y);
        }

        let mut light = Color::gray(0.2);
        let diffuse = v.normal.dot(&self.light_direction).max(0.0);
        light += Color::gray(0.8) * diffuse;

        let shadow = self.shadow_factor(v);
        let shadowed = light * (1.0 - shadow * self.shadow_strength);

        Some(color.multiply(&shadowed).min(&Color::WHITE).alpha(color.a))
    }
}

/// Light-space view-projection matrix for a directional light covering
/// the given world bounds. Pair with [`ShadowMapShader`] to render the
/// map and [`ShadowReceiverShader`] to sample it.
pub fn directional_light_matrix(light_direction: Vector3, bounds: &Box3) -> Matrix4 {
    let direction = light_direction.normalized();
    let center = bounds.center();
    let radius = (bounds.size().length() / 2.0).max(1e-6);
    let eye = center - direction * (radius * 2.0);

    let up = if direction.cross(&Vector3::UP).length() < 1e-9 {
        Vector3::UNIT_X
    } else {
        Vector3::UP
    };

    let view = Matrix4::look_at(eye, center, up);
    let projection = Matrix4::orthographic(-radius, radius, -radius, radius, 0.01, radius * 4.0);
    projection * view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_max() {
        let map = ShadowMap::new(4, 4);
        assert_eq!(map.depth(-1, 0), f64::MAX);
        assert_eq!(map.depth(0, 4), f64::MAX);
    }

    #[test]
    fn test_set_and_get() {
        let mut map = ShadowMap::new(4, 4);
        map.set_depth(2, 1, 0.25);
        assert_eq!(map.depth(2, 1), 0.25);
    }

    #[test]
    fn test_receiver_shadow_factor() {
        // A map uniformly at depth 0.1 shadows any fragment deeper than
        // that.
        let mut map = ShadowMap::new(8, 8);
        map.clear(0.1);
        let light_matrix = directional_light_matrix(
            Vector3::new(0.0, 0.0, -1.0),
            &Box3::new(Vector3::splat(-1.0), Vector3::splat(1.0)),
        );
        let shader = ShadowReceiverShader::new(
            Matrix4::IDENTITY,
            light_matrix,
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 5.0),
            Arc::new(map),
        );
        let mut v = Vertex::from_position(Vector3::ZERO);
        v.normal = Vector3::UNIT_Z;
        assert!(shader.shadow_factor(&v) > 0.99);

        // And a map at maximum depth never shadows.
        let clear = ShadowMap::new(8, 8);
        let shader = ShadowReceiverShader {
            shadow_map: Arc::new(clear),
            ..shader
        };
        assert_eq!(shader.shadow_factor(&v), 0.0);
    }

    #[test]
    fn test_directional_light_matrix_sees_bounds() {
        let bounds = Box3::new(Vector3::splat(-1.0), Vector3::splat(1.0));
        let m = directional_light_matrix(Vector3::new(-1.0, -1.0, -1.0), &bounds);
        // Every corner of the bounds lands inside the light's clip volume.
        for &x in &[bounds.min.x, bounds.max.x] {
            for &y in &[bounds.min.y, bounds.max.y] {
                for &z in &[bounds.min.z, bounds.max.z] {
                    let clip = m.mul_position_w(&Vector3::new(x, y, z));
                    assert!(!clip.outside_clip_volume(), "corner ({x},{y},{z}) clipped");
                }
            }
        }
    }
}
