//! Procedural mesh generators.

use super::{Line, Mesh, Triangle};
use crate::math::{Box3, Matrix4, Vector3};

/// Unit cube centered at the origin (spanning [-0.5, 0.5] on each axis).
pub fn cube() -> Mesh {
    let v = [
        Vector3::new(-1.0, -1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(1.0, 1.0, -1.0),
        Vector3::new(1.0, 1.0, 1.0),
    ];
    let mut mesh = Mesh::from_triangles(vec![
        Triangle::from_points(v[3], v[5], v[7]),
        Triangle::from_points(v[5], v[3], v[1]),
        Triangle::from_points(v[0], v[6], v[4]),
        Triangle::from_points(v[6], v[0], v[2]),
        Triangle::from_points(v[0], v[5], v[1]),
        Triangle::from_points(v[5], v[0], v[4]),
        Triangle::from_points(v[5], v[6], v[7]),
        Triangle::from_points(v[6], v[5], v[4]),
        Triangle::from_points(v[6], v[3], v[7]),
        Triangle::from_points(v[3], v[6], v[2]),
        Triangle::from_points(v[0], v[3], v[2]),
        Triangle::from_points(v[3], v[0], v[1]),
    ]);
    mesh.transform(&Matrix4::scaling(Vector3::splat(0.5)));
    mesh
}

/// Cube filling the given box.
pub fn cube_for_box(b: &Box3) -> Mesh {
    let m = Matrix4::translation(Vector3::splat(0.5))
        .scale(b.size())
        .translate(b.min);
    let mut mesh = cube();
    mesh.transform(&m);
    mesh
}

/// Wireframe outline of the given box.
pub fn cube_outline_for_box(b: &Box3) -> Mesh {
    let (x0, y0, z0) = (b.min.x, b.min.y, b.min.z);
    let (x1, y1, z1) = (b.max.x, b.max.y, b.max.z);
    Mesh::from_lines(vec![
        Line::from_points(Vector3::new(x0, y0, z0), Vector3::new(x0, y0, z1)),
        Line::from_points(Vector3::new(x0, y1, z0), Vector3::new(x0, y1, z1)),
        Line::from_points(Vector3::new(x1, y0, z0), Vector3::new(x1, y0, z1)),
        Line::from_points(Vector3::new(x1, y1, z0), Vector3::new(x1, y1, z1)),
        Line::from_points(Vector3::new(x0, y0, z0), Vector3::new(x0, y1, z0)),
        Line::from_points(Vector3::new(x0, y0, z1), Vector3::new(x0, y1, z1)),
        Line::from_points(Vector3::new(x1, y0, z0), Vector3::new(x1, y1, z0)),
        Line::from_points(Vector3::new(x1, y0, z1), Vector3::new(x1, y1, z1)),
        Line::from_points(Vector3::new(x0, y0, z0), Vector3::new(x1, y0, z0)),
        Line::from_points(Vector3::new(x0, y1, z0), Vector3::new(x1, y1, z0)),
        Line::from_points(Vector3::new(x0, y0, z1), Vector3::new(x1, y0, z1)),
        Line::from_points(Vector3::new(x0, y1, z1), Vector3::new(x1, y1, z1)),
    ])
}

/// Regular icosahedron inscribed in the unit sphere.
pub fn icosahedron() -> Mesh {
    const A: f64 = 0.8506507174597755;
    const B: f64 = 0.5257312591858783;
    let vertices = [
        Vector3::new(-A, -B, 0.0),
        Vector3::new(-A, B, 0.0),
        Vector3::new(-B, 0.0, -A),
        Vector3::new(-B, 0.0, A),
        Vector3::new(0.0, -A, -B),
        Vector3::new(0.0, -A, B),
        Vector3::new(0.0, A, -B),
        Vector3::new(0.0, A, B),
        Vector3::new(B, 0.0, -A),
        Vector3::new(B, 0.0, A),
        Vector3::new(A, -B, 0.0),
        Vector3::new(A, B, 0.0),
    ];
    let indices: [[usize; 3]; 20] = [
        [0, 3, 1],
        [1, 3, 7],
        [2, 0, 1],
        [2, 1, 6],
        [4, 0, 2],
        [4, 5, 0],
        [5, 3, 0],
        [6, 1, 7],
        [6, 7, 11],
        [7, 3, 9],
        [8, 2, 6],
        [8, 4, 2],
        [8, 6, 11],
        [8, 10, 4],
        [8, 11, 10],
        [9, 3, 5],
        [10, 5, 4],
        [10, 9, 5],
        [11, 7, 9],
        [11, 9, 10],
    ];
    Mesh::from_triangles(
        indices
            .iter()
            .map(|idx| Triangle::from_points(vertices[idx[0]], vertices[idx[1]], vertices[idx[2]]))
            .collect(),
    )
}

/// Unit sphere built by recursively subdividing an icosahedron `detail`
/// times and projecting onto the sphere.
pub fn sphere(detail: usize) -> Mesh {
    fn helper(detail: usize, v1: Vector3, v2: Vector3, v3: Vector3, out: &mut Vec<Triangle>) {
        if detail == 0 {
            out.push(Triangle::from_points(v1, v2, v3));
            return;
        }
        let v12 = ((v1 + v2) / 2.0).normalized();
        let v13 = ((v1 + v3) / 2.0).normalized();
        let v23 = ((v2 + v3) / 2.0).normalized();
        helper(detail - 1, v1, v12, v13, out);
        helper(detail - 1, v2, v23, v12, out);
        helper(detail - 1, v3, v13, v23, out);
        helper(detail - 1, v12, v23, v13, out);
    }

    let ico = icosahedron();
    let mut triangles = Vec::new();
    for t in &ico.triangles {
        helper(detail, t.v1.position, t.v2.position, t.v3.position, &mut triangles);
    }
    Mesh::from_triangles(triangles)
}

/// Flat plane in the XZ plane, centered at the origin.
pub fn plane(width: f64, height: f64) -> Mesh {
    let w = width / 2.0;
    let h = height / 2.0;
    let v = [
        Vector3::new(-w, 0.0, -h),
        Vector3::new(w, 0.0, -h),
        Vector3::new(w, 0.0, h),
        Vector3::new(-w, 0.0, h),
    ];
    Mesh::from_triangles(vec![
        Triangle::from_points(v[0], v[1], v[2]),
        Triangle::from_points(v[0], v[2], v[3]),
    ])
}

/// Unit cone along the Z axis, built from `step`-degree wedges.
pub fn cone(step: usize, capped: bool) -> Mesh {
    let mut triangles = Vec::new();
    let mut a0 = 0;
    while a0 < 360 {
        let a1 = (a0 + step) % 360;
        let r0 = (a0 as f64).to_radians();
        let r1 = (a1 as f64).to_radians();
        let p00 = Vector3::new(r0.cos(), r0.sin(), -0.5);
        let p10 = Vector3::new(r1.cos(), r1.sin(), -0.5);
        let apex = Vector3::new(0.0, 0.0, 0.5);
        triangles.push(Triangle::from_points(p00, p10, apex));
        if capped {
            let base = Vector3::new(0.0, 0.0, -0.5);
            triangles.push(Triangle::from_points(base, p10, p00));
        }
        a0 += step;
    }
    Mesh::from_triangles(triangles)
}

/// Cylinder along the Y axis.
pub fn cylinder(
    radius: f64,
    height: f64,
    radial_segments: usize,
    height_segments: usize,
    open_ended: bool,
) -> Mesh {
    let mut triangles = Vec::new();

    let mut rings: Vec<Vec<Vector3>> = Vec::with_capacity(height_segments + 1);
    for y in 0..=height_segments {
        let v = y as f64 / height_segments as f64 * height - height / 2.0;
        let mut ring = Vec::with_capacity(radial_segments);
        for x in 0..radial_segments {
            let u = x as f64 / radial_segments as f64 * std::f64::consts::TAU;
            ring.push(Vector3::new(u.cos() * radius, v, u.sin() * radius));
        }
        rings.push(ring);
    }

    for y in 0..height_segments {
        for x in 0..radial_segments {
            let x1 = (x + 1) % radial_segments;
            let v1 = rings[y][x];
            let v2 = rings[y + 1][x];
            let v3 = rings[y][x1];
            let v4 = rings[y + 1][x1];
            triangles.push(Triangle::from_points(v1, v2, v3));
            triangles.push(Triangle::from_points(v2, v4, v3));
        }
    }

    if !open_ended {
        let top_center = Vector3::new(0.0, height / 2.0, 0.0);
        let bottom_center = Vector3::new(0.0, -height / 2.0, 0.0);
        for x in 0..radial_segments {
            let x1 = (x + 1) % radial_segments;
            triangles.push(Triangle::from_points(
                top_center,
                rings[height_segments][x],
                rings[height_segments][x1],
            ));
            triangles.push(Triangle::from_points(bottom_center, rings[0][x1], rings[0][x]));
        }
    }

    Mesh::from_triangles(triangles)
}

/// Torus around the Y axis.
pub fn torus(radius: f64, tube_radius: f64, radial_segments: usize, tubular_segments: usize) -> Mesh {
    let mut rings: Vec<Vec<Vector3>> = Vec::with_capacity(radial_segments);
    for i in 0..radial_segments {
        let u = i as f64 / radial_segments as f64 * std::f64::consts::TAU;
        let mut ring = Vec::with_capacity(tubular_segments);
        for j in 0..tubular_segments {
            let v = j as f64 / tubular_segments as f64 * std::f64::consts::TAU;
            ring.push(Vector3::new(
                (radius + tube_radius * v.cos()) * u.cos(),
                tube_radius * v.sin(),
                (radius + tube_radius * v.cos()) * u.sin(),
            ));
        }
        rings.push(ring);
    }

    let mut triangles = Vec::new();
    for i in 0..radial_segments {
        let i1 = (i + 1) % radial_segments;
        for j in 0..tubular_segments {
            let j1 = (j + 1) % tubular_segments;
            let v1 = rings[i][j];
            let v2 = rings[i][j1];
            let v3 = rings[i1][j];
            let v4 = rings[i1][j1];
            triangles.push(Triangle::from_points(v1, v2, v3));
            triangles.push(Triangle::from_points(v2, v4, v3));
        }
    }
    Mesh::from_triangles(triangles)
}

/// Capsule along the Y axis: a cylinder with hemispherical caps.
pub fn capsule(
    radius: f64,
    height: f64,
    radial_segments: usize,
    height_segments: usize,
    cap_detail: usize,
) -> Mesh {
    let mut mesh = Mesh::new();
    let cylinder_height = height - 2.0 * radius;

    if cylinder_height > 0.0 {
        mesh.add(&cylinder(radius, cylinder_height, radial_segments, height_segments, true));
    }

    let mut top = sphere(cap_detail);
    top.transform(
        &Matrix4::scaling(Vector3::splat(radius))
            .translate(Vector3::new(0.0, cylinder_height / 2.0, 0.0)),
    );
    mesh.add(&top);

    let mut bottom = sphere(cap_detail);
    bottom.transform(
        &Matrix4::scaling(Vector3::splat(radius))
            .translate(Vector3::new(0.0, -cylinder_height / 2.0, 0.0)),
    );
    mesh.add(&bottom);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_bounds() {
        let b = cube().bounding_box();
        assert!(b.min.approx_eq(&Vector3::splat(-0.5), 1e-12));
        assert!(b.max.approx_eq(&Vector3::splat(0.5), 1e-12));
    }

    #[test]
    fn test_icosahedron_on_unit_sphere() {
        for t in &icosahedron().triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                assert!((v.position.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_sphere_subdivision_counts() {
        assert_eq!(sphere(0).triangles.len(), 20);
        assert_eq!(sphere(1).triangles.len(), 80);
        assert_eq!(sphere(2).triangles.len(), 320);
    }

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        for t in &sphere(2).triangles {
            for v in [&t.v1, &t.v2, &t.v3] {
                assert!((v.position.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cube_outline_has_12_edges() {
        let b = Box3::new(Vector3::ZERO, Vector3::ONE);
        assert_eq!(cube_outline_for_box(&b).lines.len(), 12);
    }

    #[test]
    fn test_cylinder_closed_vs_open() {
        let closed = cylinder(1.0, 2.0, 8, 1, false);
        let open = cylinder(1.0, 2.0, 8, 1, true);
        assert_eq!(closed.triangles.len() - open.triangles.len(), 16);
    }

    #[test]
    fn test_cone_triangle_counts() {
        assert_eq!(cone(60, false).triangles.len(), 6);
        assert_eq!(cone(60, true).triangles.len(), 12);
    }

    #[test]
    fn test_torus_triangle_count() {
        assert_eq!(torus(2.0, 0.5, 8, 6).triangles.len(), 96);
    }

    #[test]
    fn test_capsule_bounds() {
        let b = capsule(0.5, 3.0, 8, 1, 1).bounding_box();
        assert!((b.max.y - 1.5).abs() < 1e-9);
        assert!((b.min.y + 1.5).abs() < 1e-9);
        assert!((b.max.x - 0.5).abs() < 1e-9);
    }
}
