//! Triangle primitive.

use super::Vertex;
use crate::math::{Box3, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// A triangle holding three vertices by value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex.
    pub v1: Vertex,
    /// Second vertex.
    pub v2: Vertex,
    /// Third vertex.
    pub v3: Vertex,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(v1: Vertex, v2: Vertex, v3: Vertex) -> Self {
        Self { v1, v2, v3 }
    }

    /// Create a triangle from three points; vertex normals are set to the
    /// face normal.
    pub fn from_points(p1: Vector3, p2: Vector3, p3: Vector3) -> Self {
        let mut t = Self {
            v1: Vertex::from_position(p1),
            v2: Vertex::from_position(p2),
            v3: Vertex::from_position(p3),
        };
        t.fix_normals();
        t
    }

    /// Face normal: normalized cross product of the edge vectors.
    pub fn normal(&self) -> Vector3 {
        let e1 = self.v2.position - self.v1.position;
        let e2 = self.v3.position - self.v1.position;
        e1.cross(&e2).normalized()
    }

    /// Area of the triangle (half the cross product magnitude).
    pub fn area(&self) -> f64 {
        let e1 = self.v2.position - self.v1.position;
        let e2 = self.v3.position - self.v1.position;
        e1.cross(&e2).length() / 2.0
    }

    /// Axis-aligned bounding box of the three vertex positions.
    pub fn bounding_box(&self) -> Box3 {
        Box3::from_points(&[self.v1.position, self.v2.position, self.v3.position])
    }

    /// Replace the vertex normals with the face normal.
    pub fn fix_normals(&mut self) {
        let n = self.normal();
        self.v1.normal = n;
        self.v2.normal = n;
        self.v3.normal = n;
    }

    /// Reverse the winding order, flipping the face orientation and the
    /// vertex normals.
    pub fn reverse_winding(&mut self) {
        std::mem::swap(&mut self.v1, &mut self.v3);
        self.v1.normal = -self.v1.normal;
        self.v2.normal = -self.v2.normal;
        self.v3.normal = -self.v3.normal;
    }

    /// Whether the triangle cannot be rasterized: non-finite positions or
    /// (near) zero area.
    pub fn is_degenerate(&self) -> bool {
        self.v1.position.is_degenerate()
            || self.v2.position.is_degenerate()
            || self.v3.position.is_degenerate()
            || self.area() < 1e-12
    }

    /// Transform positions by a matrix and normals by its inverse
    /// transpose, renormalizing.
    pub fn transform(&mut self, matrix: &Matrix4, normal_matrix: &Matrix4) {
        for v in [&mut self.v1, &mut self.v2, &mut self.v3] {
            v.position = matrix.mul_position(&v.position);
            v.normal = normal_matrix.mul_direction(&v.normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_right_triangle() -> Triangle {
        Triangle::from_points(
            Vector3::ZERO,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_normal_and_area() {
        let t = unit_right_triangle();
        assert!(t.normal().approx_eq(&Vector3::UNIT_Z, 1e-12));
        assert!((t.area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normal_orthogonal_to_edges() {
        let t = Triangle::from_points(
            Vector3::new(0.3, -1.0, 2.0),
            Vector3::new(4.0, 0.5, -1.0),
            Vector3::new(-2.0, 3.0, 0.7),
        );
        let n = t.normal();
        assert!(n.dot(&(t.v2.position - t.v1.position)).abs() < 1e-10);
        assert!(n.dot(&(t.v3.position - t.v1.position)).abs() < 1e-10);
    }

    #[test]
    fn test_reverse_winding_flips_normal() {
        let mut t = unit_right_triangle();
        let n = t.normal();
        t.reverse_winding();
        assert!(t.normal().approx_eq(&(-n), 1e-12));
        assert!(t.v1.normal.approx_eq(&(-n), 1e-12));
    }

    #[test]
    fn test_degenerate() {
        let zero_area = Triangle::from_points(
            Vector3::ZERO,
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(2.0, 2.0, 2.0),
        );
        assert!(zero_area.is_degenerate());
        assert!(!unit_right_triangle().is_degenerate());
    }
}
