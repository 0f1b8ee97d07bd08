//! View frustum extraction and intersection tests for culling.

use super::{Box3, Matrix4, Plane, Vector3};
use serde::{Deserialize, Serialize};

/// A view frustum defined by 6 planes with inward-facing normals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frustum {
    /// The six planes of the frustum.
    /// Order: left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a new frustum from 6 planes.
    #[inline]
    pub const fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the frustum from a combined projection-view matrix.
    ///
    /// With row-major storage and the column-vector convention, a clip-space
    /// position satisfies -w <= x <= w (and likewise for y, z), so each
    /// plane is the sum or difference of the last matrix row with another
    /// row, normalized.
    pub fn from_matrix(m: &Matrix4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);

        let plane = |a: super::Vector4, b: super::Vector4| {
            Plane {
                normal: Vector3::new(a.x + b.x, a.y + b.y, a.z + b.z),
                constant: a.w + b.w,
            }
            .normalized()
        };

        Self {
            planes: [
                plane(r3, r0),  // left:   w + x >= 0
                plane(r3, -r0), // right:  w - x >= 0
                plane(r3, r1),  // bottom: w + y >= 0
                plane(r3, -r1), // top:    w - y >= 0
                plane(r3, r2),  // near:   w + z >= 0
                plane(r3, -r2), // far:    w - z >= 0
            ],
        }
    }

    /// Check if a point is inside the frustum.
    pub fn contains_point(&self, point: &Vector3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Check if an AABB intersects the frustum. The test is conservative:
    /// a box that touches the frustum is never rejected.
    pub fn intersects_box(&self, box3: &Box3) -> bool {
        for plane in &self.planes {
            // The box corner furthest along the plane normal.
            let p = Vector3::new(
                if plane.normal.x > 0.0 { box3.max.x } else { box3.min.x },
                if plane.normal.y > 0.0 { box3.max.y } else { box3.min.y },
                if plane.normal.z > 0.0 { box3.max.z } else { box3.min.z },
            );
            if plane.distance_to_point(&p) < 0.0 {
                return false;
            }
        }
        true
    }
}
