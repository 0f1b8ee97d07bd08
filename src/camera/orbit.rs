//! Orbit camera controller.

use super::Camera;
use crate::math::Vector3;

/// Keeps the vertical angle away from the poles to avoid gimbal flip.
const POLE_EPSILON: f64 = 0.1;

/// Orbits a perspective camera around a target on a sphere parameterized
/// by distance and two angles.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// The driven camera.
    pub camera: Camera,
    /// Orbit center.
    pub target: Vector3,
    /// Distance from the target.
    pub distance: f64,
    /// Azimuth angle in radians.
    pub horizontal_angle: f64,
    /// Polar angle in radians, clamped away from the poles.
    pub vertical_angle: f64,
}

impl OrbitCamera {
    /// Create an orbit camera at the given distance, looking at `target`.
    pub fn new(
        name: impl Into<String>,
        target: Vector3,
        distance: f64,
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let camera = Camera::perspective(
            name,
            target + Vector3::new(0.0, 0.0, distance),
            target,
            Vector3::UP,
            fov_y,
            aspect,
            near,
            far,
        );
        // Angles that reproduce the initial position on the +z axis.
        let mut orbit = Self {
            camera,
            target,
            distance,
            horizontal_angle: std::f64::consts::FRAC_PI_2,
            vertical_angle: std::f64::consts::FRAC_PI_2,
        };
        orbit.update();
        orbit
    }

    /// Recompute the camera position from the spherical parameters.
    pub fn update(&mut self) {
        let theta = self.vertical_angle;
        let phi = self.horizontal_angle;
        let offset = Vector3::new(
            self.distance * theta.sin() * phi.cos(),
            self.distance * theta.cos(),
            self.distance * theta.sin() * phi.sin(),
        );
        self.camera
            .look_at(self.target + offset, self.target, Vector3::UP);
    }

    /// Rotate around the target; the vertical angle is clamped to
    /// (ε, π - ε).
    pub fn rotate(&mut self, horizontal_delta: f64, vertical_delta: f64) {
        self.horizontal_angle += horizontal_delta;
        self.vertical_angle = (self.vertical_angle + vertical_delta)
            .clamp(POLE_EPSILON, std::f64::consts::PI - POLE_EPSILON);
        self.update();
    }

    /// Move toward or away from the target.
    pub fn zoom(&mut self, delta: f64) {
        self.distance = (self.distance + delta).max(0.1);
        self.update();
    }
}
