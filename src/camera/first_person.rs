//! First-person camera controller.

use super::Camera;
use crate::math::Vector3;

/// Keeps the pitch away from straight up or down.
const PITCH_EPSILON: f64 = 0.1;

/// A yaw/pitch camera controller with planar movement.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    /// The driven camera.
    pub camera: Camera,
    /// Heading angle in radians; -π/2 looks down negative z.
    pub yaw: f64,
    /// Elevation angle in radians, clamped short of the poles.
    pub pitch: f64,
    /// Movement speed multiplier.
    pub speed: f64,
}

impl FirstPersonCamera {
    /// Create a first-person camera looking down negative z.
    pub fn new(
        name: impl Into<String>,
        position: Vector3,
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        let camera = Camera::perspective(
            name,
            position,
            position + Vector3::new(0.0, 0.0, -1.0),
            Vector3::UP,
            fov_y,
            aspect,
            near,
            far,
        );
        let mut fp = Self {
            camera,
            yaw: -std::f64::consts::FRAC_PI_2,
            pitch: 0.0,
            speed: 1.0,
        };
        fp.update();
        fp
    }

    fn forward(&self) -> Vector3 {
        Vector3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalized()
    }

    /// Recompute target and up from yaw and pitch. The view up vector is
    /// rebuilt from right = forward x world-up.
    pub fn update(&mut self) {
        let forward = self.forward();
        let right = forward.cross(&Vector3::UP).normalized();
        let up = right.cross(&forward).normalized();
        self.camera.target = self.camera.position + forward;
        self.camera.up = up;
    }

    /// Turn the view; pitch is clamped to (-π/2 + ε, π/2 - ε).
    pub fn rotate(&mut self, yaw_delta: f64, pitch_delta: f64) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(
            -std::f64::consts::FRAC_PI_2 + PITCH_EPSILON,
            std::f64::consts::FRAC_PI_2 - PITCH_EPSILON,
        );
        self.update();
    }

    /// Move relative to the view: x strafes, y rises along world up,
    /// z moves along the view direction.
    pub fn translate(&mut self, direction: Vector3) {
        let forward = self.forward();
        let right = forward.cross(&Vector3::UP).normalized();
        let movement = forward * (direction.z * self.speed)
            + right * (direction.x * self.speed)
            + Vector3::UP * (direction.y * self.speed);
        self.camera.position += movement;
        self.update();
    }
}
