//! CPU-side 2D texture with wrap modes, filtering, and a mipmap chain.

use super::UvModifier;
use crate::core::RenderError;
use crate::math::Color;

/// Texture addressing mode, applied per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Repeat the texture (`u - floor(u)`).
    #[default]
    Repeat,
    /// Clamp to [0, 1].
    Clamp,
    /// Reflect every unit.
    Mirror,
}

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation of the four surrounding texels.
    #[default]
    Bilinear,
    /// Mipmapped sampling. Currently falls back to bilinear on level 0;
    /// the chain is retained for derivative-based selection later.
    Mipmap,
}

#[derive(Debug, Clone)]
struct MipLevel {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// A 2D texture owning an RGBA8 pixel buffer and its mipmap chain.
/// Texel values are treated as linear.
#[derive(Debug, Clone)]
pub struct Texture2D {
    width: usize,
    height: usize,
    data: Vec<u8>,
    /// Addressing mode for the U axis.
    pub wrap_u: WrapMode,
    /// Addressing mode for the V axis.
    pub wrap_v: WrapMode,
    /// Filter used by [`Texture2D::sample`].
    pub filter: FilterMode,
    /// Optional UV transform stack applied before wrapping.
    pub uv_modifier: Option<UvModifier>,
    mip_levels: Vec<MipLevel>,
}

impl Texture2D {
    /// Create a texture from a tightly packed RGBA8 buffer. Generates the
    /// mipmap chain.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimension { what: "texture", width, height });
        }
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(RenderError::BufferSize { expected, got: data.len() });
        }
        let mut texture = Self {
            width,
            height,
            data,
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            filter: FilterMode::Bilinear,
            uv_modifier: None,
            mip_levels: Vec::new(),
        };
        texture.generate_mipmaps();
        Ok(texture)
    }

    /// Create a single-color texture.
    pub fn solid(width: usize, height: usize, color: Color) -> Result<Self, RenderError> {
        let texel = color.to_rgba8();
        let data = texel
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();
        Self::new(width, height, data)
    }

    /// Create a texture from a row-major slice of colors.
    pub fn from_colors(width: usize, height: usize, colors: &[Color]) -> Result<Self, RenderError> {
        let mut data = Vec::with_capacity(colors.len() * 4);
        for c in colors {
            data.extend_from_slice(&c.to_rgba8());
        }
        Self::new(width, height, data)
    }

    /// Texture width in texels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Texture height in texels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of mip levels, including the base level.
    #[inline]
    pub fn mip_level_count(&self) -> usize {
        self.mip_levels.len()
    }

    /// Sample at (u, v) with the texture's own filter mode.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        self.sample_with_filter(u, v, self.filter)
    }

    /// Sample at (u, v) with forced bilinear filtering.
    pub fn bilinear_sample(&self, u: f64, v: f64) -> Color {
        self.sample_with_filter(u, v, FilterMode::Bilinear)
    }

    /// Sample at (u, v) with an explicit filter mode.
    ///
    /// The pipeline is: UV modifier (if bound), wrap per axis, v-flip
    /// (image origin is top-left, UV origin bottom-left), then filtering.
    pub fn sample_with_filter(&self, u: f64, v: f64, filter: FilterMode) -> Color {
        let (u, v) = match &self.uv_modifier {
            Some(modifier) => modifier.transform_uv(u, v),
            None => (u, v),
        };

        let u = wrap(u, self.wrap_u);
        let v = wrap(v, self.wrap_v);
        let v = 1.0 - v;

        match filter {
            FilterMode::Nearest => self.sample_nearest(u, v),
            FilterMode::Bilinear => self.sample_bilinear(u, v),
            FilterMode::Mipmap => self.sample_bilinear(u, v),
        }
    }

    fn texel(&self, x: usize, y: usize) -> Color {
        let i = (y * self.width + x) * 4;
        Color::from_rgba8(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    fn sample_nearest(&self, u: f64, v: f64) -> Color {
        let x = (u * (self.width - 1) as f64 + 0.5) as usize;
        let y = (v * (self.height - 1) as f64 + 0.5) as usize;
        self.texel(x.min(self.width - 1), y.min(self.height - 1))
    }

    fn sample_bilinear(&self, u: f64, v: f64) -> Color {
        let x = u * (self.width - 1) as f64;
        let y = v * (self.height - 1) as f64;

        let x0 = (x as usize).min(self.width - 1);
        let y0 = (y as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x - x.floor();
        let fy = y - y.floor();

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x1, y0);
        let c01 = self.texel(x0, y1);
        let c11 = self.texel(x1, y1);

        let top = c00.lerp(&c10, fx);
        let bottom = c01.lerp(&c11, fx);
        top.lerp(&bottom, fy)
    }

    /// Rebuild the mipmap chain from the base level by box-filter
    /// downsampling until 1x1.
    pub fn generate_mipmaps(&mut self) {
        self.mip_levels.clear();
        self.mip_levels.push(MipLevel {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        });

        loop {
            let next = {
                let prev = self.mip_levels.last().unwrap();
                if prev.width == 1 && prev.height == 1 {
                    break;
                }
                let w = (prev.width / 2).max(1);
                let h = (prev.height / 2).max(1);
                let mut data = Vec::with_capacity(w * h * 4);
                for y in 0..h {
                    for x in 0..w {
                        let x0 = (x * 2).min(prev.width - 1);
                        let y0 = (y * 2).min(prev.height - 1);
                        let x1 = (x * 2 + 1).min(prev.width - 1);
                        let y1 = (y * 2 + 1).min(prev.height - 1);
                        for c in 0..4 {
                            let sum = prev.data[(y0 * prev.width + x0) * 4 + c] as u32
                                + prev.data[(y0 * prev.width + x1) * 4 + c] as u32
                                + prev.data[(y1 * prev.width + x0) * 4 + c] as u32
                                + prev.data[(y1 * prev.width + x1) * 4 + c] as u32;
                            data.push((sum / 4) as u8);
                        }
                    }
                }
                MipLevel { width: w, height: h, data }
            };
            self.mip_levels.push(next);
        }
    }
}

/// Apply a wrap mode to a single coordinate.
pub fn wrap(coord: f64, mode: WrapMode) -> f64 {
    match mode {
        WrapMode::Repeat => coord - coord.floor(),
        WrapMode::Clamp => coord.clamp(0.0, 1.0),
        WrapMode::Mirror => {
            let c = coord - coord.floor();
            if ((coord.floor() as i64) % 2 + 2) % 2 == 1 {
                1.0 - c
            } else {
                c
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_texture() -> Texture2D {
        Texture2D::from_colors(
            2,
            2,
            &[Color::RED, Color::GREEN, Color::BLUE, Color::new(1.0, 1.0, 0.0, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_dimension() {
        assert!(matches!(
            Texture2D::new(0, 4, vec![]),
            Err(RenderError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_bilinear_center_average() {
        let t = quad_texture();
        let c = t.bilinear_sample(0.5, 0.5);
        assert!(c.approx_eq(&Color::new(0.5, 0.5, 0.25, 1.0), 1e-9));
    }

    #[test]
    fn test_bilinear_at_texel_centers_matches_nearest() {
        let t = quad_texture();
        for &(u, v) in &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            let bilinear = t.sample_with_filter(u, v, FilterMode::Bilinear);
            let nearest = t.sample_with_filter(u, v, FilterMode::Nearest);
            assert!(bilinear.approx_eq(&nearest, 1e-9));
        }
    }

    #[test]
    fn test_wrap_modes() {
        assert!((wrap(1.25, WrapMode::Repeat) - 0.25).abs() < 1e-12);
        assert!((wrap(-0.25, WrapMode::Repeat) - 0.75).abs() < 1e-12);
        assert_eq!(wrap(1.5, WrapMode::Clamp), 1.0);
        assert_eq!(wrap(-0.5, WrapMode::Clamp), 0.0);
        // Mirror has period 2.
        assert!((wrap(1.25, WrapMode::Mirror) - 0.75).abs() < 1e-12);
        assert!((wrap(0.25, WrapMode::Mirror) - 0.25).abs() < 1e-12);
        assert!((wrap(2.25, WrapMode::Mirror) - wrap(0.25, WrapMode::Mirror)).abs() < 1e-12);
    }

    #[test]
    fn test_repeat_wrap_sampling_periodic() {
        let t = quad_texture();
        let a = t.sample(1.25, 0.25);
        let b = t.sample(0.25, 0.25);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mip_chain_dimensions() {
        let t = Texture2D::solid(8, 4, Color::WHITE).unwrap();
        // 8x4 -> 4x2 -> 2x1 -> 1x1
        assert_eq!(t.mip_level_count(), 4);
    }

    #[test]
    fn test_uv_modifier_hook() {
        let mut t = quad_texture();
        let mut modifier = super::super::UvModifier::new();
        modifier.global.offset_u = 1.0;
        modifier.global.pivot_u = 0.0;
        modifier.global.pivot_v = 0.0;
        t.uv_modifier = Some(modifier);
        // A full-period offset is invisible under repeat wrapping.
        let shifted = t.sample(0.25, 0.25);
        let mut plain = quad_texture();
        plain.uv_modifier = None;
        assert_eq!(shifted, plain.sample(0.25, 0.25));
    }
}
