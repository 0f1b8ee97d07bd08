//! Line segment primitive for wireframe rendering.

use super::Vertex;
use crate::math::{Box3, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// A line segment between two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    /// First endpoint.
    pub v1: Vertex,
    /// Second endpoint.
    pub v2: Vertex,
}

impl Line {
    /// Create a line from two vertices.
    pub fn new(v1: Vertex, v2: Vertex) -> Self {
        Self { v1, v2 }
    }

    /// Create a line from two points.
    pub fn from_points(p1: Vector3, p2: Vector3) -> Self {
        Self {
            v1: Vertex::from_position(p1),
            v2: Vertex::from_position(p2),
        }
    }

    /// Axis-aligned bounding box of the two endpoints.
    pub fn bounding_box(&self) -> Box3 {
        Box3::from_points(&[self.v1.position, self.v2.position])
    }

    /// Transform positions by a matrix and normals by its inverse
    /// transpose.
    pub fn transform(&mut self, matrix: &Matrix4, normal_matrix: &Matrix4) {
        for v in [&mut self.v1, &mut self.v2] {
            v.position = matrix.mul_position(&v.position);
            v.normal = normal_matrix.mul_direction(&v.normal);
        }
    }
}
