//! Light sources.

use crate::math::{Color, Vector3};
use serde::{Deserialize, Serialize};

/// A light source in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Parallel rays from a direction (sun-like).
    Directional {
        /// Direction the light travels, unit length.
        direction: Vector3,
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
    },
    /// Omnidirectional light at a position.
    Point {
        /// World-space position.
        position: Vector3,
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
        /// Attenuation range; 0 disables distance attenuation.
        range: f64,
    },
    /// Cone-shaped light.
    Spot {
        /// World-space position.
        position: Vector3,
        /// Direction the light travels, unit length.
        direction: Vector3,
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
        /// Attenuation range; 0 disables distance attenuation.
        range: f64,
        /// Inner cone half-angle in radians (full intensity inside).
        inner_cone: f64,
        /// Outer cone half-angle in radians (zero intensity outside).
        outer_cone: f64,
    },
    /// Uniform illumination of all surfaces.
    Ambient {
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
    },
}

impl Light {
    /// Create a directional light; the direction is normalized.
    pub fn directional(direction: Vector3, color: Color, intensity: f64) -> Self {
        Self::Directional {
            direction: direction.normalized(),
            color,
            intensity,
        }
    }

    /// Create a point light.
    pub fn point(position: Vector3, color: Color, intensity: f64, range: f64) -> Self {
        Self::Point { position, color, intensity, range }
    }

    /// Create a spot light; the direction is normalized.
    #[allow(clippy::too_many_arguments)]
    pub fn spot(
        position: Vector3,
        direction: Vector3,
        color: Color,
        intensity: f64,
        range: f64,
        inner_cone: f64,
        outer_cone: f64,
    ) -> Self {
        Self::Spot {
            position,
            direction: direction.normalized(),
            color,
            intensity,
            range,
            inner_cone,
            outer_cone,
        }
    }

    /// Create an ambient light.
    pub fn ambient(color: Color, intensity: f64) -> Self {
        Self::Ambient { color, intensity }
    }

    /// Whether this is an ambient light.
    #[inline]
    pub fn is_ambient(&self) -> bool {
        matches!(self, Self::Ambient { .. })
    }
}
