//! 4x4 matrix implementation.

use super::{Box3, Vector3, Vector4};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A 4x4 matrix stored in row-major order, using the column-vector
/// convention (`clip = M * v`).
/// Used for model, view, and projection transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix4 {
    /// Matrix elements in row-major order:
    /// [m00, m01, m02, m03, m10, m11, ..., m33]
    pub elements: [f64; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Create a new Matrix4 from elements in row-major (reading) order.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m00: f64, m01: f64, m02: f64, m03: f64,
        m10: f64, m11: f64, m12: f64, m13: f64,
        m20: f64, m21: f64, m22: f64, m23: f64,
        m30: f64, m31: f64, m32: f64, m33: f64,
    ) -> Self {
        Self {
            elements: [
                m00, m01, m02, m03,
                m10, m11, m12, m13,
                m20, m21, m22, m23,
                m30, m31, m32, m33,
            ],
        }
    }

    /// Create from a row-major array.
    #[inline]
    pub const fn from_rows_array(elements: [f64; 16]) -> Self {
        Self { elements }
    }

    /// Element at (row, col).
    #[inline]
    pub const fn at(&self, row: usize, col: usize) -> f64 {
        self.elements[row * 4 + col]
    }

    /// Row as a Vector4.
    #[inline]
    pub const fn row(&self, row: usize) -> Vector4 {
        Vector4 {
            x: self.elements[row * 4],
            y: self.elements[row * 4 + 1],
            z: self.elements[row * 4 + 2],
            w: self.elements[row * 4 + 3],
        }
    }

    /// Translation matrix.
    pub const fn translation(v: Vector3) -> Self {
        Self::new(
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Scaling matrix.
    pub const fn scaling(v: Vector3) -> Self {
        Self::new(
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Axis-angle rotation matrix (Rodrigues form, counter-clockwise for a
    /// positive angle when looking down the axis toward the origin).
    pub fn rotation(axis: Vector3, angle: f64) -> Self {
        let v = axis.normalized();
        let s = angle.sin();
        let c = angle.cos();
        let m = 1.0 - c;
        Self::new(
            m * v.x * v.x + c, m * v.x * v.y - v.z * s, m * v.x * v.z + v.y * s, 0.0,
            m * v.x * v.y + v.z * s, m * v.y * v.y + c, m * v.y * v.z - v.x * s, 0.0,
            m * v.x * v.z - v.y * s, m * v.y * v.z + v.x * s, m * v.z * v.z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation that maps unit vector `from` onto unit vector `to`.
    pub fn rotate_to(from: Vector3, to: Vector3) -> Self {
        let dot = from.dot(&to);
        if dot >= 1.0 {
            Self::IDENTITY
        } else if dot <= -1.0 {
            Self::rotation(from.perpendicular(), std::f64::consts::PI)
        } else {
            let angle = dot.acos();
            let axis = from.cross(&to).normalized();
            Self::rotation(axis, angle)
        }
    }

    /// Place an object of the given size at a position, oriented along `up`
    /// and spun by `rotation` about its own axis.
    pub fn orient(position: Vector3, size: Vector3, up: Vector3, rotation: f64) -> Self {
        Self::rotation(Vector3::UNIT_Z, rotation)
            .scale(size)
            .then_rotate_to(Vector3::UNIT_Z, up)
            .translate(position)
    }

    /// Perspective frustum projection.
    pub fn frustum(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Self {
        Self::new(
            2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0,
            0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0,
            0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0, 0.0, -1.0, 0.0,
        )
    }

    /// Orthographic projection.
    pub fn orthographic(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Self {
        Self::new(
            2.0 / (r - l), 0.0, 0.0, -(r + l) / (r - l),
            0.0, 2.0 / (t - b), 0.0, -(t + b) / (t - b),
            0.0, 0.0, -2.0 / (f - n), -(f + n) / (f - n),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Symmetric perspective projection. `fov_y` is the vertical field of
    /// view in radians.
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let ymax = near * (fov_y / 2.0).tan();
        let xmax = ymax * aspect;
        Self::frustum(-xmax, xmax, -ymax, ymax, near, far)
    }

    /// Right-handed look-at view matrix.
    pub fn look_at(eye: Vector3, center: Vector3, up: Vector3) -> Self {
        let z = (eye - center).normalized();
        let x = up.cross(&z).normalized();
        let y = z.cross(&x);
        Self::new(
            x.x, x.y, x.z, -x.dot(&eye),
            y.x, y.y, y.z, -y.dot(&eye),
            z.x, z.y, z.z, -z.dot(&eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation part of a look-at matrix for a forward direction.
    pub fn look_at_direction(forward: Vector3, up: Vector3) -> Self {
        let z = forward.normalized();
        let x = up.cross(&z).normalized();
        let y = z.cross(&x);
        Self::new(
            x.x, x.y, x.z, 0.0,
            y.x, y.y, y.z, 0.0,
            z.x, z.y, z.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Map NDC to screen coordinates: x to [0, w], y to [h, 0] (flipped),
    /// z to [0, 1].
    pub fn screen(w: usize, h: usize) -> Self {
        let w2 = w as f64 / 2.0;
        let h2 = h as f64 / 2.0;
        Self::new(
            w2, 0.0, 0.0, w2,
            0.0, -h2, 0.0, h2,
            0.0, 0.0, 0.5, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Map NDC to an arbitrary viewport rectangle (y up, z to [0, 1]).
    pub fn viewport(x: f64, y: f64, w: f64, h: f64) -> Self {
        let l = x;
        let b = y;
        let r = x + w;
        let t = y + h;
        Self::new(
            (r - l) / 2.0, 0.0, 0.0, (r + l) / 2.0,
            0.0, (t - b) / 2.0, 0.0, (t + b) / 2.0,
            0.0, 0.0, 0.5, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    // === Left-composed builder methods (the new transform applies after
    // the existing one) ===

    /// Translate after this transform.
    pub fn translate(&self, v: Vector3) -> Self {
        Self::translation(v) * *self
    }

    /// Scale after this transform.
    pub fn scale(&self, v: Vector3) -> Self {
        Self::scaling(v) * *self
    }

    /// Rotate after this transform.
    pub fn rotate(&self, axis: Vector3, angle: f64) -> Self {
        Self::rotation(axis, angle) * *self
    }

    /// Apply a rotate-to after this transform.
    pub fn then_rotate_to(&self, from: Vector3, to: Vector3) -> Self {
        Self::rotate_to(from, to) * *self
    }

    // === Transform application ===

    /// Transform a point (homogeneous w = 1) and divide out w.
    pub fn mul_position(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        let x = e[0] * v.x + e[1] * v.y + e[2] * v.z + e[3];
        let y = e[4] * v.x + e[5] * v.y + e[6] * v.z + e[7];
        let z = e[8] * v.x + e[9] * v.y + e[10] * v.z + e[11];
        let w = e[12] * v.x + e[13] * v.y + e[14] * v.z + e[15];
        if w != 0.0 && w != 1.0 {
            Vector3::new(x / w, y / w, z / w)
        } else {
            Vector3::new(x, y, z)
        }
    }

    /// Transform a point (homogeneous w = 1), keeping the w component.
    pub fn mul_position_w(&self, v: &Vector3) -> Vector4 {
        let e = &self.elements;
        Vector4 {
            x: e[0] * v.x + e[1] * v.y + e[2] * v.z + e[3],
            y: e[4] * v.x + e[5] * v.y + e[6] * v.z + e[7],
            z: e[8] * v.x + e[9] * v.y + e[10] * v.z + e[11],
            w: e[12] * v.x + e[13] * v.y + e[14] * v.z + e[15],
        }
    }

    /// Transform a direction (homogeneous w = 0) and renormalize.
    pub fn mul_direction(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * v.x + e[1] * v.y + e[2] * v.z,
            y: e[4] * v.x + e[5] * v.y + e[6] * v.z,
            z: e[8] * v.x + e[9] * v.y + e[10] * v.z,
        }
        .normalized()
    }

    /// Transform an AABB into a conservative AABB by summing the extrema of
    /// each column contribution.
    pub fn mul_box(&self, b: &Box3) -> Box3 {
        let e = &self.elements;
        let r = Vector3::new(e[0], e[4], e[8]);
        let u = Vector3::new(e[1], e[5], e[9]);
        let f = Vector3::new(e[2], e[6], e[10]);
        let t = Vector3::new(e[3], e[7], e[11]);
        let xa = r * b.min.x;
        let xb = r * b.max.x;
        let ya = u * b.min.y;
        let yb = u * b.max.y;
        let za = f * b.min.z;
        let zb = f * b.max.z;
        let (xa, xb) = (xa.min(&xb), xa.max(&xb));
        let (ya, yb) = (ya.min(&yb), ya.max(&yb));
        let (za, zb) = (za.min(&zb), za.max(&zb));
        Box3 {
            min: xa + ya + za + t,
            max: xb + yb + zb + t,
        }
    }

    /// Transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let e = &self.elements;
        Self::new(
            e[0], e[4], e[8], e[12],
            e[1], e[5], e[9], e[13],
            e[2], e[6], e[10], e[14],
            e[3], e[7], e[11], e[15],
        )
    }

    /// Determinant by cofactor expansion.
    pub fn determinant(&self) -> f64 {
        let a = &self.elements;
        a[0] * a[5] * a[10] * a[15] - a[0] * a[5] * a[11] * a[14]
            + a[0] * a[6] * a[11] * a[13] - a[0] * a[6] * a[9] * a[15]
            + a[0] * a[7] * a[9] * a[14] - a[0] * a[7] * a[10] * a[13]
            - a[1] * a[6] * a[11] * a[12] + a[1] * a[6] * a[8] * a[15]
            - a[1] * a[7] * a[8] * a[14] + a[1] * a[7] * a[10] * a[12]
            - a[1] * a[4] * a[10] * a[15] + a[1] * a[4] * a[11] * a[14]
            + a[2] * a[7] * a[8] * a[13] - a[2] * a[7] * a[9] * a[12]
            + a[2] * a[4] * a[9] * a[15] - a[2] * a[4] * a[11] * a[13]
            + a[2] * a[5] * a[11] * a[12] - a[2] * a[5] * a[8] * a[15]
            - a[3] * a[4] * a[9] * a[14] + a[3] * a[4] * a[10] * a[13]
            - a[3] * a[5] * a[10] * a[12] + a[3] * a[5] * a[8] * a[14]
            - a[3] * a[6] * a[8] * a[13] + a[3] * a[6] * a[9] * a[12]
    }

    /// Inverse by cofactor expansion. A singular matrix yields the identity
    /// rather than failing.
    pub fn inverse(&self) -> Self {
        let d = self.determinant();
        if d == 0.0 {
            return Self::IDENTITY;
        }
        let a = &self.elements;
        let mut m = [0.0; 16];
        m[0] = (a[6] * a[11] * a[13] - a[7] * a[10] * a[13] + a[7] * a[9] * a[14]
            - a[5] * a[11] * a[14] - a[6] * a[9] * a[15] + a[5] * a[10] * a[15]) / d;
        m[1] = (a[3] * a[10] * a[13] - a[2] * a[11] * a[13] - a[3] * a[9] * a[14]
            + a[1] * a[11] * a[14] + a[2] * a[9] * a[15] - a[1] * a[10] * a[15]) / d;
        m[2] = (a[2] * a[7] * a[13] - a[3] * a[6] * a[13] + a[3] * a[5] * a[14]
            - a[1] * a[7] * a[14] - a[2] * a[5] * a[15] + a[1] * a[6] * a[15]) / d;
        m[3] = (a[3] * a[6] * a[9] - a[2] * a[7] * a[9] - a[3] * a[5] * a[10]
            + a[1] * a[7] * a[10] + a[2] * a[5] * a[11] - a[1] * a[6] * a[11]) / d;
        m[4] = (a[7] * a[10] * a[12] - a[6] * a[11] * a[12] - a[7] * a[8] * a[14]
            + a[4] * a[11] * a[14] + a[6] * a[8] * a[15] - a[4] * a[10] * a[15]) / d;
        m[5] = (a[2] * a[11] * a[12] - a[3] * a[10] * a[12] + a[3] * a[8] * a[14]
            - a[0] * a[11] * a[14] - a[2] * a[8] * a[15] + a[0] * a[10] * a[15]) / d;
        m[6] = (a[3] * a[6] * a[12] - a[2] * a[7] * a[12] - a[3] * a[4] * a[14]
            + a[0] * a[7] * a[14] + a[2] * a[4] * a[15] - a[0] * a[6] * a[15]) / d;
        m[7] = (a[2] * a[7] * a[8] - a[3] * a[6] * a[8] + a[3] * a[4] * a[10]
            - a[0] * a[7] * a[10] - a[2] * a[4] * a[11] + a[0] * a[6] * a[11]) / d;
        m[8] = (a[5] * a[11] * a[12] - a[7] * a[9] * a[12] + a[7] * a[8] * a[13]
            - a[4] * a[11] * a[13] - a[5] * a[8] * a[15] + a[4] * a[9] * a[15]) / d;
        m[9] = (a[3] * a[9] * a[12] - a[1] * a[11] * a[12] - a[3] * a[8] * a[13]
            + a[0] * a[11] * a[13] + a[1] * a[8] * a[15] - a[0] * a[9] * a[15]) / d;
        m[10] = (a[1] * a[7] * a[12] - a[3] * a[5] * a[12] + a[3] * a[4] * a[13]
            - a[0] * a[7] * a[13] - a[1] * a[4] * a[15] + a[0] * a[5] * a[15]) / d;
        m[11] = (a[3] * a[5] * a[8] - a[1] * a[7] * a[8] - a[3] * a[4] * a[9]
            + a[0] * a[7] * a[9] + a[1] * a[4] * a[11] - a[0] * a[5] * a[11]) / d;
        m[12] = (a[6] * a[9] * a[12] - a[5] * a[10] * a[12] - a[6] * a[8] * a[13]
            + a[4] * a[10] * a[13] + a[5] * a[8] * a[14] - a[4] * a[9] * a[14]) / d;
        m[13] = (a[1] * a[10] * a[12] - a[2] * a[9] * a[12] + a[2] * a[8] * a[13]
            - a[0] * a[10] * a[13] - a[1] * a[8] * a[14] + a[0] * a[9] * a[14]) / d;
        m[14] = (a[2] * a[5] * a[12] - a[1] * a[6] * a[12] - a[2] * a[4] * a[13]
            + a[0] * a[6] * a[13] + a[1] * a[4] * a[14] - a[0] * a[5] * a[14]) / d;
        m[15] = (a[1] * a[6] * a[8] - a[2] * a[5] * a[8] + a[2] * a[4] * a[9]
            - a[0] * a[6] * a[9] - a[1] * a[4] * a[10] + a[0] * a[5] * a[10]) / d;
        Self::from_rows_array(m)
    }

    /// Check if the matrix is approximately equal to another.
    pub fn approx_eq(&self, other: &Matrix4, epsilon: f64) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.elements;
        let b = &rhs.elements;
        let mut e = [0.0; 16];
        for (r, row) in e.chunks_exact_mut(4).enumerate() {
            for (c, out) in row.iter_mut().enumerate() {
                *out = a[r * 4] * b[c]
                    + a[r * 4 + 1] * b[4 + c]
                    + a[r * 4 + 2] * b[8 + c]
                    + a[r * 4 + 3] * b[12 + c];
            }
        }
        Self::from_rows_array(e)
    }
}

impl From<glam::DMat4> for Matrix4 {
    fn from(m: glam::DMat4) -> Self {
        let c = m.to_cols_array();
        let mut e = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                e[row * 4 + col] = c[col * 4 + row];
            }
        }
        Self::from_rows_array(e)
    }
}

impl From<Matrix4> for glam::DMat4 {
    fn from(m: Matrix4) -> Self {
        let mut c = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                c[col * 4 + row] = m.elements[row * 4 + col];
            }
        }
        glam::DMat4::from_cols_array(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_multiplication() {
        let m = Matrix4::translation(Vector3::new(1.0, 2.0, 3.0))
            .rotate(Vector3::UNIT_Y, 0.7)
            .scale(Vector3::new(2.0, 2.0, 2.0));
        assert!((Matrix4::IDENTITY * m).approx_eq(&m, 1e-12));
        assert!((m * Matrix4::IDENTITY).approx_eq(&m, 1e-12));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = Matrix4::translation(Vector3::new(1.0, -2.0, 3.0))
            .rotate(Vector3::new(1.0, 1.0, 0.0), 0.4)
            .scale(Vector3::new(1.5, 0.5, 2.0));
        assert!(m.determinant().abs() > 1e-9);
        let p = m * m.inverse();
        assert!(p.approx_eq(&Matrix4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_singular_inverse_is_identity() {
        let m = Matrix4::scaling(Vector3::new(1.0, 0.0, 1.0));
        assert_eq!(m.inverse(), Matrix4::IDENTITY);
    }

    #[test]
    fn test_mul_position_matches_homogeneous() {
        let m = Matrix4::perspective(std::f64::consts::FRAC_PI_4, 1.5, 0.1, 100.0)
            * Matrix4::look_at(Vector3::new(0.0, 1.0, 5.0), Vector3::ZERO, Vector3::UP);
        let p = Vector3::new(0.3, -0.2, 1.0);
        let hw = m.mul_position_w(&p);
        assert!(hw.w != 0.0);
        assert!(m
            .mul_position(&p)
            .approx_eq(&hw.perspective_divide(), 1e-12));
    }

    #[test]
    fn test_rotation() {
        let m = Matrix4::rotation(Vector3::UNIT_Z, std::f64::consts::FRAC_PI_2);
        let v = m.mul_position(&Vector3::UNIT_X);
        assert!(v.approx_eq(&Vector3::UNIT_Y, 1e-12));
    }

    #[test]
    fn test_rotate_to() {
        let a = Vector3::new(1.0, 2.0, -0.5).normalized();
        let b = Vector3::new(-3.0, 0.2, 1.0).normalized();
        let m = Matrix4::rotate_to(a, b);
        assert!(m.mul_position(&a).approx_eq(&b, 1e-12));
    }

    #[test]
    fn test_translate_composition_order() {
        // translate(v) * M translates after M.
        let m = Matrix4::scaling(Vector3::splat(2.0)).translate(Vector3::new(1.0, 0.0, 0.0));
        let p = m.mul_position(&Vector3::UNIT_X);
        assert!(p.approx_eq(&Vector3::new(3.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_serde_roundtrip() {
        let m = Matrix4::look_at(Vector3::new(1.0, 2.0, 3.0), Vector3::ZERO, Vector3::UP);
        let json = serde_json::to_string(&m).unwrap();
        let back: Matrix4 = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn test_mul_box_conservative() {
        let b = Box3::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let m = Matrix4::rotation(Vector3::UNIT_Y, 0.3).translate(Vector3::new(5.0, 0.0, 0.0));
        let tb = m.mul_box(&b);
        // Every transformed corner must be contained in the transformed box.
        for &x in &[b.min.x, b.max.x] {
            for &y in &[b.min.y, b.max.y] {
                for &z in &[b.min.z, b.max.z] {
                    let p = m.mul_position(&Vector3::new(x, y, z));
                    assert!(tb.contains_point(&p));
                }
            }
        }
    }
}
