//! Cameras and camera controllers.

mod first_person;
mod orbit;

pub use first_person::FirstPersonCamera;
pub use orbit::OrbitCamera;

use crate::math::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Projection variant and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Symmetric perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f64,
        /// Width / height.
        aspect: f64,
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
    /// Orthographic projection.
    Orthographic {
        /// Vertical extent of the view volume.
        size: f64,
        /// Width / height.
        aspect: f64,
        /// Near plane distance.
        near: f64,
        /// Far plane distance.
        far: f64,
    },
}

/// A camera: a look-at pose plus a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera name, used for lookup in a scene.
    pub name: String,
    /// Eye position.
    pub position: Vector3,
    /// Look-at target.
    pub target: Vector3,
    /// Up direction.
    pub up: Vector3,
    /// Projection parameters.
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera. `fov_y` is in radians.
    #[allow(clippy::too_many_arguments)]
    pub fn perspective(
        name: impl Into<String>,
        position: Vector3,
        target: Vector3,
        up: Vector3,
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            target,
            up,
            projection: Projection::Perspective { fov_y, aspect, near, far },
        }
    }

    /// Create an orthographic camera. `size` is the vertical extent of
    /// the view volume.
    #[allow(clippy::too_many_arguments)]
    pub fn orthographic(
        name: impl Into<String>,
        position: Vector3,
        target: Vector3,
        up: Vector3,
        size: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            target,
            up,
            projection: Projection::Orthographic { size, aspect, near, far },
        }
    }

    /// Point the camera from `position` toward `target`.
    pub fn look_at(&mut self, position: Vector3, target: Vector3, up: Vector3) {
        self.position = position;
        self.target = target;
        self.up = up;
    }

    /// The world-to-camera view matrix.
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::look_at(self.position, self.target, self.up)
    }

    /// The projection matrix for the camera's variant.
    pub fn projection_matrix(&self) -> Matrix4 {
        match self.projection {
            Projection::Perspective { fov_y, aspect, near, far } => {
                Matrix4::perspective(fov_y, aspect, near, far)
            }
            Projection::Orthographic { size, aspect, near, far } => {
                let width = size * aspect;
                let height = size;
                Matrix4::orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    near,
                    far,
                )
            }
        }
    }

    /// The combined projection-view matrix.
    pub fn camera_matrix(&self) -> Matrix4 {
        self.projection_matrix() * self.view_matrix()
    }
}
