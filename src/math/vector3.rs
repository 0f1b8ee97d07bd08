//! 3D vector implementation.

use super::Matrix4;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3D vector with x, y, and z components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Zero vector (0, 0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    /// One vector (1, 1, 1).
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    /// Unit X vector (1, 0, 0).
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    /// Unit Y vector (0, 1, 0).
    pub const UNIT_Y: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    /// Unit Z vector (0, 0, 1).
    pub const UNIT_Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };
    /// Up vector (0, 1, 0).
    pub const UP: Self = Self::UNIT_Y;

    /// Create a new Vector3.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to the same value.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Create from an array.
    #[inline]
    pub const fn from_array(a: [f64; 3]) -> Self {
        Self { x: a[0], y: a[1], z: a[2] }
    }

    /// Convert to an array.
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Get the squared length of the vector.
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Check whether any component is NaN or infinite.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite())
    }

    /// Return a normalized copy of the vector.
    /// A zero-length input yields the zero vector rather than NaN.
    #[inline]
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector.
    #[inline]
    pub fn cross(&self, other: &Vector3) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Distance to another vector.
    #[inline]
    pub fn distance_to(&self, other: &Vector3) -> f64 {
        (*self - *other).length()
    }

    /// Squared distance to another vector.
    #[inline]
    pub fn distance_to_squared(&self, other: &Vector3) -> f64 {
        (*self - *other).length_squared()
    }

    /// Linear interpolation to another vector.
    #[inline]
    pub fn lerp(&self, other: &Vector3, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Move a given distance toward another vector.
    #[inline]
    pub fn lerp_distance(&self, other: &Vector3, d: f64) -> Self {
        *self + (*other - *self).normalized() * d
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&self, other: &Vector3) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&self, other: &Vector3) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// The smallest of the three components.
    #[inline]
    pub fn min_component(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }

    /// The largest of the three components.
    #[inline]
    pub fn max_component(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }

    /// Floor all components.
    #[inline]
    pub fn floor(&self) -> Self {
        Self {
            x: self.x.floor(),
            y: self.y.floor(),
            z: self.z.floor(),
        }
    }

    /// Ceil all components.
    #[inline]
    pub fn ceil(&self) -> Self {
        Self {
            x: self.x.ceil(),
            y: self.y.ceil(),
            z: self.z.ceil(),
        }
    }

    /// Round all components to the nearest integer.
    #[inline]
    pub fn round(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
            z: self.z.round(),
        }
    }

    /// Absolute value of all components.
    #[inline]
    pub fn abs(&self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }

    /// Raise all components to a power.
    #[inline]
    pub fn pow(&self, e: f64) -> Self {
        Self {
            x: self.x.powf(e),
            y: self.y.powf(e),
            z: self.z.powf(e),
        }
    }

    /// Reflect this vector off a surface with the given normal.
    #[inline]
    pub fn reflect(&self, normal: &Vector3) -> Self {
        *self - *normal * 2.0 * normal.dot(self)
    }

    /// Any unit vector orthogonal to this one.
    /// Well-defined for nonzero input; zero input yields the zero vector.
    pub fn perpendicular(&self) -> Self {
        if self.x == 0.0 && self.y == 0.0 {
            if self.z == 0.0 {
                return Self::ZERO;
            }
            return Self::UNIT_Y;
        }
        Self::new(-self.y, self.x, 0.0).normalized()
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn multiply(&self, other: &Vector3) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Component-wise division.
    #[inline]
    pub fn divide(&self, other: &Vector3) -> Self {
        Self {
            x: self.x / other.x,
            y: self.y / other.y,
            z: self.z / other.z,
        }
    }

    /// Distance from this point to the segment [v, w].
    pub fn segment_distance(&self, v: &Vector3, w: &Vector3) -> f64 {
        let l2 = v.distance_to_squared(w);
        if l2 == 0.0 {
            return self.distance_to(v);
        }
        let t = (*self - *v).dot(&(*w - *v)) / l2;
        if t < 0.0 {
            return self.distance_to(v);
        }
        if t > 1.0 {
            return self.distance_to(w);
        }
        (*v + (*w - *v) * t).distance_to(self)
    }

    /// Apply a Matrix4 as a point transform (homogeneous w = 1, divide out).
    #[inline]
    pub fn apply_matrix4(&self, m: &Matrix4) -> Self {
        m.mul_position(self)
    }

    /// Strict component ordering, for deterministic ordering of positions.
    pub fn less(&self, other: &Vector3) -> bool {
        if self.x != other.x {
            return self.x < other.x;
        }
        if self.y != other.y {
            return self.y < other.y;
        }
        self.z < other.z
    }

    /// Check if the vector is approximately equal to another.
    #[inline]
    pub fn approx_eq(&self, other: &Vector3, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

// Operator implementations
impl Add for Vector3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl SubAssign for Vector3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3 {
            x: self * rhs.x,
            y: self * rhs.y,
            z: self * rhs.z,
        }
    }
}

impl MulAssign<f64> for Vector3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

impl DivAssign<f64> for Vector3 {
    #[inline]
    fn div_assign(&mut self, rhs: f64) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}

impl Neg for Vector3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<glam::DVec3> for Vector3 {
    fn from(v: glam::DVec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vector3> for glam::DVec3 {
    fn from(v: Vector3) -> Self {
        glam::DVec3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross() {
        let x = Vector3::UNIT_X;
        let y = Vector3::UNIT_Y;
        let z = x.cross(&y);
        assert!(z.approx_eq(&Vector3::UNIT_Z, 1e-12));
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = Vector3::new(3.0, -4.0, 12.0);
        assert!((v.normalized().length() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    }

    #[test]
    fn test_reflect() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        let n = Vector3::UNIT_Y;
        let r = v.reflect(&n);
        assert!(r.approx_eq(&Vector3::new(1.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_perpendicular() {
        for v in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::UNIT_Z,
            Vector3::new(-5.0, 0.1, 0.0),
        ] {
            let p = v.perpendicular();
            assert!((p.length() - 1.0).abs() < 1e-12);
            assert!(v.dot(&p).abs() < 1e-12);
        }
        assert_eq!(Vector3::ZERO.perpendicular(), Vector3::ZERO);
    }

    #[test]
    fn test_segment_distance() {
        let a = Vector3::new(0.0, 1.0, 0.0);
        let v = Vector3::new(-1.0, 0.0, 0.0);
        let w = Vector3::new(1.0, 0.0, 0.0);
        assert!((a.segment_distance(&v, &w) - 1.0).abs() < 1e-12);
        let b = Vector3::new(3.0, 0.0, 0.0);
        assert!((b.segment_distance(&v, &w) - 2.0).abs() < 1e-12);
    }
}
