//! Plane implementation.

use super::Vector3;
use serde::{Deserialize, Serialize};

/// An infinite plane defined by a normal and constant.
/// The plane equation is: normal . point + constant = 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Plane {
    /// Normal vector of the plane (unit length once normalized).
    pub normal: Vector3,
    /// Signed distance term (negative of d in ax + by + cz + d = 0).
    pub constant: f64,
}

impl Plane {
    /// Create a new plane.
    #[inline]
    pub const fn new(normal: Vector3, constant: f64) -> Self {
        Self { normal, constant }
    }

    /// Create a plane from a normal and a point on the plane.
    #[inline]
    pub fn from_normal_and_point(normal: Vector3, point: &Vector3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            constant: -point.dot(&n),
        }
    }

    /// Signed distance from a point to the plane. Positive is the side the
    /// normal points toward.
    #[inline]
    pub fn distance_to_point(&self, point: &Vector3) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// Return a copy scaled so the normal has unit length.
    pub fn normalized(&self) -> Self {
        let inv_len = 1.0 / self.normal.length();
        Self {
            normal: self.normal * inv_len,
            constant: self.constant * inv_len,
        }
    }
}
