//! Vertex attribute bundle.

use crate::math::{Color, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A single vertex with the attributes carried through the pipeline.
///
/// `output` is the clip-space position written by the vertex stage of a
/// shader and consumed by the rasterizer; it is meaningless before the
/// vertex stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in model or world space.
    pub position: Vector3,
    /// Normal vector (unit length after smoothing).
    pub normal: Vector3,
    /// Texture coordinate. Two-dimensional; z is kept at 0.
    pub texcoord: Vector3,
    /// Vertex color.
    pub color: Color,
    /// Clip-space position produced by the vertex stage.
    pub output: Vector4,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            normal: Vector3::ZERO,
            texcoord: Vector3::ZERO,
            color: Color::WHITE,
            output: Vector4::ZERO,
        }
    }
}

impl Vertex {
    /// Create a vertex with every attribute specified.
    pub fn new(position: Vector3, normal: Vector3, texcoord: Vector3, color: Color) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color,
            output: Vector4::ZERO,
        }
    }

    /// Create a vertex from a bare position.
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Barycentric interpolation of three vertices. The normal is
    /// renormalized; use this for geometry processing (splitting,
    /// subdivision), not for fragment interpolation.
    pub fn interpolate(v1: &Vertex, v2: &Vertex, v3: &Vertex, b1: f64, b2: f64, b3: f64) -> Self {
        Self {
            position: v1.position * b1 + v2.position * b2 + v3.position * b3,
            normal: (v1.normal * b1 + v2.normal * b2 + v3.normal * b3).normalized(),
            texcoord: v1.texcoord * b1 + v2.texcoord * b2 + v3.texcoord * b3,
            color: v1.color * b1 + v2.color * b2 + v3.color * b3,
            output: Vector4::ZERO,
        }
    }

    /// Linear interpolation of every attribute, including `output`.
    /// Used when clipping edges in homogeneous clip space.
    pub fn lerp(&self, other: &Vertex, t: f64) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            normal: self.normal.lerp(&other.normal, t),
            texcoord: self.texcoord.lerp(&other.texcoord, t),
            color: self.color.lerp(&other.color, t),
            output: self.output.lerp(&other.output, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let a = Vertex::new(
            Vector3::ZERO,
            Vector3::UNIT_Y,
            Vector3::ZERO,
            Color::BLACK,
        );
        let b = Vertex::new(
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::UNIT_Y,
            Vector3::new(1.0, 0.0, 0.0),
            Color::WHITE,
        );
        let c = Vertex::new(
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::UNIT_Y,
            Vector3::new(0.0, 1.0, 0.0),
            Color::WHITE,
        );
        let m = Vertex::interpolate(&a, &b, &c, 0.5, 0.5, 0.0);
        assert!(m.position.approx_eq(&Vector3::new(1.0, 0.0, 0.0), 1e-12));
        assert!(m.texcoord.approx_eq(&Vector3::new(0.5, 0.0, 0.0), 1e-12));
        assert!((m.normal.length() - 1.0).abs() < 1e-12);
    }
}
