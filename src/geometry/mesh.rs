//! Triangle mesh container and geometry processing.

use super::{Line, Triangle, Vertex};
use crate::math::{Box3, Matrix4, Vector3};
use std::cell::Cell;
use std::collections::HashMap;

/// Hashable key for a vertex position, so vertices can be grouped by
/// location (f64 itself is neither `Eq` nor `Hash`).
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct PositionKey([u64; 3]);

impl PositionKey {
    fn of(v: &Vector3) -> Self {
        // +0.0 so that -0.0 and 0.0 share a key.
        Self([
            (v.x + 0.0).to_bits(),
            (v.y + 0.0).to_bits(),
            (v.z + 0.0).to_bits(),
        ])
    }
}

/// An ordered collection of triangles plus optional wireframe lines.
///
/// The bounding box is cached lazily and invalidated by the mutating
/// methods; if the `triangles` vector is edited directly, call
/// [`Mesh::invalidate_bounds`].
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Triangles of the mesh.
    pub triangles: Vec<Triangle>,
    /// Wireframe line segments.
    pub lines: Vec<Line>,
    bounds: Cell<Option<Box3>>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from triangles.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            lines: Vec::new(),
            bounds: Cell::new(None),
        }
    }

    /// Create a mesh from line segments.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self {
            triangles: Vec::new(),
            lines,
            bounds: Cell::new(None),
        }
    }

    /// Drop the cached bounding box.
    pub fn invalidate_bounds(&self) {
        self.bounds.set(None);
    }

    /// Append the contents of another mesh.
    pub fn add(&mut self, other: &Mesh) {
        self.triangles.extend_from_slice(&other.triangles);
        self.lines.extend_from_slice(&other.lines);
        self.invalidate_bounds();
    }

    /// Axis-aligned bounding box over all triangles and lines, cached.
    pub fn bounding_box(&self) -> Box3 {
        if let Some(b) = self.bounds.get() {
            return b;
        }
        let mut b = Box3::EMPTY;
        for t in &self.triangles {
            b = b.extend(&t.bounding_box());
        }
        for l in &self.lines {
            b = b.extend(&l.bounding_box());
        }
        self.bounds.set(Some(b));
        b
    }

    /// Enclosed volume, assuming a closed orientable surface.
    pub fn volume(&self) -> f64 {
        let mut v = 0.0;
        for t in &self.triangles {
            let p1 = t.v1.position;
            let p2 = t.v2.position;
            let p3 = t.v3.position;
            v += p1.x * (p2.y * p3.z - p3.y * p2.z) - p2.x * (p1.y * p3.z - p3.y * p1.z)
                + p3.x * (p1.y * p2.z - p2.y * p1.z);
        }
        (v / 6.0).abs()
    }

    /// Total triangle surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Replace each vertex normal with the unit sum of all face normals
    /// sharing its position. Idempotent.
    pub fn smooth_normals(&mut self) {
        let mut lookup: HashMap<PositionKey, Vector3> = HashMap::new();
        for t in &self.triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                *lookup.entry(PositionKey::of(&v.position)).or_default() += v.normal;
            }
        }
        for n in lookup.values_mut() {
            *n = n.normalized();
        }
        for t in &mut self.triangles {
            for v in [&mut t.v1, &mut t.v2, &mut t.v3] {
                v.normal = lookup[&PositionKey::of(&v.position)];
            }
        }
    }

    /// Like [`Mesh::smooth_normals`] but only sums face normals whose dot
    /// product with the vertex's own normal is at least cos(radians),
    /// preserving sharp edges.
    pub fn smooth_normals_threshold(&mut self, radians: f64) {
        let threshold = radians.cos();
        let mut lookup: HashMap<PositionKey, Vec<Vector3>> = HashMap::new();
        for t in &self.triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                lookup
                    .entry(PositionKey::of(&v.position))
                    .or_default()
                    .push(v.normal);
            }
        }
        for t in &mut self.triangles {
            for v in [&mut t.v1, &mut t.v2, &mut t.v3] {
                let mut sum = Vector3::ZERO;
                for n in &lookup[&PositionKey::of(&v.position)] {
                    if n.dot(&v.normal) >= threshold {
                        sum += *n;
                    }
                }
                v.normal = sum.normalized();
            }
        }
    }

    /// Uniformly scale and translate the mesh to fit inside the [-1, 1]
    /// cube, preserving aspect ratio. Returns the applied matrix.
    pub fn bi_unit_cube(&mut self) -> Matrix4 {
        let r = 1.0;
        self.fit_inside(
            &Box3::new(Vector3::splat(-r), Vector3::splat(r)),
            Vector3::splat(0.5),
        )
    }

    /// Uniformly scale and translate the mesh to fit inside the
    /// [-0.5, 0.5] cube, preserving aspect ratio. Returns the applied
    /// matrix.
    pub fn unit_cube(&mut self) -> Matrix4 {
        let r = 0.5;
        self.fit_inside(
            &Box3::new(Vector3::splat(-r), Vector3::splat(r)),
            Vector3::splat(0.5),
        )
    }

    /// Translate the mesh so its bounding-box anchor lands on `position`.
    /// Returns the applied matrix.
    pub fn move_to(&mut self, position: Vector3, anchor: Vector3) -> Matrix4 {
        let matrix = Matrix4::translation(position - self.bounding_box().anchor(anchor));
        self.transform(&matrix);
        matrix
    }

    /// Center the mesh on the origin. Returns the applied matrix.
    pub fn center(&mut self) -> Matrix4 {
        self.move_to(Vector3::ZERO, Vector3::splat(0.5))
    }

    /// Uniformly scale and translate the mesh to fit inside `target`,
    /// positioned by `anchor` within the leftover space. Returns the
    /// applied matrix.
    pub fn fit_inside(&mut self, target: &Box3, anchor: Vector3) -> Matrix4 {
        let bounds = self.bounding_box();
        let scale = target.size().divide(&bounds.size()).min_component();
        let extra = target.size() - bounds.size() * scale;
        let matrix = Matrix4::IDENTITY
            .translate(-bounds.min)
            .scale(Vector3::splat(scale))
            .translate(target.min + extra.multiply(&anchor));
        self.transform(&matrix);
        matrix
    }

    /// Apply a matrix to every vertex position; normals are transformed by
    /// the inverse transpose and renormalized.
    pub fn transform(&mut self, matrix: &Matrix4) {
        let normal_matrix = matrix.transpose().inverse();
        for t in &mut self.triangles {
            t.transform(matrix, &normal_matrix);
        }
        for l in &mut self.lines {
            l.transform(matrix, &normal_matrix);
        }
        self.invalidate_bounds();
    }

    /// Reverse the winding of every triangle.
    pub fn reverse_winding(&mut self) {
        for t in &mut self.triangles {
            t.reverse_winding();
        }
    }

    /// Recursively bisect each triangle along its longest edge until all
    /// edges are at most `max_edge_length`. New vertex attributes are
    /// barycentric-interpolated.
    pub fn split_triangles(&mut self, max_edge_length: f64) {
        fn split(t: Triangle, max_len: f64, out: &mut Vec<Triangle>) {
            let p1 = t.v1.position;
            let p2 = t.v2.position;
            let p3 = t.v3.position;
            let d12 = p1.distance_to(&p2);
            let d23 = p2.distance_to(&p3);
            let d31 = p3.distance_to(&p1);
            let max = d12.max(d23).max(d31);
            if max <= max_len {
                out.push(t);
            } else if d12 == max {
                let v = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.5, 0.5, 0.0);
                split(Triangle::new(t.v3, t.v1, v), max_len, out);
                split(Triangle::new(t.v2, t.v3, v), max_len, out);
            } else if d23 == max {
                let v = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.0, 0.5, 0.5);
                split(Triangle::new(t.v1, t.v2, v), max_len, out);
                split(Triangle::new(t.v3, t.v1, v), max_len, out);
            } else {
                let v = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.5, 0.0, 0.5);
                split(Triangle::new(t.v2, t.v3, v), max_len, out);
                split(Triangle::new(t.v1, t.v2, v), max_len, out);
            }
        }

        let mut triangles = Vec::with_capacity(self.triangles.len());
        for t in self.triangles.drain(..) {
            split(t, max_edge_length, &mut triangles);
        }
        self.triangles = triangles;
        self.invalidate_bounds();
    }

    /// Split every triangle at its edge midpoints into four.
    pub fn subdivide(&mut self) {
        let mut triangles = Vec::with_capacity(self.triangles.len() * 4);
        for t in &self.triangles {
            let m12 = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.5, 0.5, 0.0);
            let m23 = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.0, 0.5, 0.5);
            let m31 = Vertex::interpolate(&t.v1, &t.v2, &t.v3, 0.5, 0.0, 0.5);
            triangles.push(Triangle::new(t.v1, m12, m31));
            triangles.push(Triangle::new(t.v2, m23, m12));
            triangles.push(Triangle::new(t.v3, m31, m23));
            triangles.push(Triangle::new(m12, m23, m31));
        }
        self.triangles = triangles;
        self.invalidate_bounds();
    }

    /// Extract edges shared by faces whose normals differ by more than
    /// `angle_threshold` radians, as a wireframe mesh.
    pub fn sharp_edges(&self, angle_threshold: f64) -> Mesh {
        type EdgeKey = (PositionKey, PositionKey);

        fn make_edge(a: &Vector3, b: &Vector3) -> (EdgeKey, Vector3, Vector3) {
            if a.less(b) {
                ((PositionKey::of(a), PositionKey::of(b)), *a, *b)
            } else {
                ((PositionKey::of(b), PositionKey::of(a)), *b, *a)
            }
        }

        let mut lines = Vec::new();
        let mut other: HashMap<EdgeKey, Vector3> = HashMap::new();
        for t in &self.triangles {
            let p1 = t.v1.position;
            let p2 = t.v2.position;
            let p3 = t.v3.position;
            let normal = t.normal();
            for (key, a, b) in [make_edge(&p1, &p2), make_edge(&p2, &p3), make_edge(&p3, &p1)] {
                if let Some(n) = other.get(&key) {
                    let angle = normal.dot(n).clamp(-1.0, 1.0).acos();
                    if angle > angle_threshold {
                        lines.push(Line::from_points(a, b));
                    }
                }
                other.insert(key, normal);
            }
        }
        Mesh::from_lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;

    #[test]
    fn test_bounding_box_invalidated_by_transform() {
        let mut mesh = primitives::cube();
        let before = mesh.bounding_box();
        mesh.transform(&Matrix4::translation(Vector3::new(10.0, 0.0, 0.0)));
        let after = mesh.bounding_box();
        assert!((after.min.x - (before.min.x + 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_bbox_matches_mul_box() {
        let mut mesh = primitives::sphere(1);
        let m = Matrix4::scaling(Vector3::new(2.0, 1.0, 0.5))
            .translate(Vector3::new(1.0, 2.0, 3.0));
        let expected = m.mul_box(&mesh.bounding_box());
        mesh.transform(&m);
        let got = mesh.bounding_box();
        assert!(got.min.approx_eq(&expected.min, 1e-9));
        assert!(got.max.approx_eq(&expected.max, 1e-9));
    }

    #[test]
    fn test_bi_unit_cube_idempotent() {
        let mut a = primitives::sphere(2);
        a.transform(&Matrix4::scaling(Vector3::new(3.0, 1.0, 2.0)));
        a.bi_unit_cube();
        let mut b = a.clone();
        b.bi_unit_cube();
        for (ta, tb) in a.triangles.iter().zip(b.triangles.iter()) {
            assert!(ta.v1.position.approx_eq(&tb.v1.position, 1e-9));
            assert!(ta.v2.position.approx_eq(&tb.v2.position, 1e-9));
            assert!(ta.v3.position.approx_eq(&tb.v3.position, 1e-9));
        }
    }

    #[test]
    fn test_smooth_normals_idempotent() {
        let mut a = primitives::sphere(2);
        a.smooth_normals();
        let mut b = a.clone();
        b.smooth_normals();
        for (ta, tb) in a.triangles.iter().zip(b.triangles.iter()) {
            assert!(ta.v1.normal.approx_eq(&tb.v1.normal, 1e-9));
        }
    }

    #[test]
    fn test_smooth_normals_unit_length() {
        let mut mesh = primitives::cube();
        mesh.smooth_normals();
        for t in &mesh.triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                assert!((v.normal.length() - 1.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_split_triangles_edge_bound() {
        let mut mesh = primitives::cube();
        mesh.split_triangles(0.3);
        for t in &mesh.triangles {
            let d12 = t.v1.position.distance_to(&t.v2.position);
            let d23 = t.v2.position.distance_to(&t.v3.position);
            let d31 = t.v3.position.distance_to(&t.v1.position);
            assert!(d12 <= 0.3 + 1e-12);
            assert!(d23 <= 0.3 + 1e-12);
            assert!(d31 <= 0.3 + 1e-12);
        }
    }

    #[test]
    fn test_cube_volume_and_area() {
        let mesh = primitives::cube();
        assert!((mesh.volume() - 1.0).abs() < 1e-12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharp_edges_of_cube() {
        let mesh = primitives::cube();
        let edges = mesh.sharp_edges(0.5);
        assert_eq!(edges.lines.len(), 12);
    }
}
