//! Axis-aligned bounding box implementation.

use super::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box defined by minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    /// Minimum corner.
    pub min: Vector3,
    /// Maximum corner.
    pub max: Vector3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Box3 {
    /// The empty box. Extending it with any box yields that box.
    pub const EMPTY: Self = Self {
        min: Vector3 { x: f64::INFINITY, y: f64::INFINITY, z: f64::INFINITY },
        max: Vector3 { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY, z: f64::NEG_INFINITY },
    };

    /// Create a new box from min and max corners.
    #[inline]
    pub const fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Create a box containing a set of points.
    pub fn from_points(points: &[Vector3]) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.min = b.min.min(p);
            b.max = b.max.max(p);
        }
        b
    }

    /// Whether the box contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Point at a normalized anchor position within the box
    /// ((0,0,0) = min corner, (1,1,1) = max corner).
    #[inline]
    pub fn anchor(&self, anchor: Vector3) -> Vector3 {
        self.min + self.size().multiply(&anchor)
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Vector3 {
        self.anchor(Vector3::splat(0.5))
    }

    /// Size of the box along each axis.
    #[inline]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Smallest box containing both boxes.
    pub fn extend(&self, other: &Box3) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Grow (or shrink, for negative x) the box by the same amount on all
    /// sides.
    pub fn offset(&self, x: f64) -> Self {
        Self {
            min: self.min - Vector3::splat(x),
            max: self.max + Vector3::splat(x),
        }
    }

    /// Translate the box.
    pub fn translate(&self, v: Vector3) -> Self {
        Self {
            min: self.min + v,
            max: self.max + v,
        }
    }

    /// Whether a point is inside the box (inclusive).
    pub fn contains_point(&self, p: &Vector3) -> bool {
        self.min.x <= p.x
            && self.max.x >= p.x
            && self.min.y <= p.y
            && self.max.y >= p.y
            && self.min.z <= p.z
            && self.max.z >= p.z
    }

    /// Whether two boxes overlap.
    pub fn intersects(&self, other: &Box3) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y
            || self.min.z > other.max.z
            || self.max.z < other.min.z)
    }

    /// Overlapping region of two boxes, or the empty box.
    pub fn intersection(&self, other: &Box3) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }
        Self {
            min: self.min.max(&other.min),
            max: self.max.min(&other.max),
        }
    }

    /// Transform by a matrix, producing a conservative AABB.
    pub fn transform(&self, m: &Matrix4) -> Self {
        m.mul_box(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_from_empty() {
        let b = Box3::new(Vector3::new(-1.0, 0.0, 2.0), Vector3::new(1.0, 3.0, 4.0));
        assert_eq!(Box3::EMPTY.extend(&b), b);
        assert!(Box3::EMPTY.is_empty());
    }

    #[test]
    fn test_anchor_and_center() {
        let b = Box3::new(Vector3::ZERO, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b.anchor(Vector3::new(1.0, 0.0, 0.5)), Vector3::new(2.0, 0.0, 3.0));
    }

    #[test]
    fn test_intersection() {
        let a = Box3::new(Vector3::ZERO, Vector3::splat(2.0));
        let b = Box3::new(Vector3::splat(1.0), Vector3::splat(3.0));
        let c = a.intersection(&b);
        assert_eq!(c, Box3::new(Vector3::splat(1.0), Vector3::splat(2.0)));
        let far = Box3::new(Vector3::splat(10.0), Vector3::splat(11.0));
        assert!(a.intersection(&far).is_empty());
    }
}
