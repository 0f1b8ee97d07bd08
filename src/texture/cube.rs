//! Cube map texture for environment sampling.

use super::Texture2D;
use crate::math::{Color, Vector3};

/// Index of each face in a [`CubeTexture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum CubeFace {
    /// +X face.
    PositiveX = 0,
    /// -X face.
    NegativeX = 1,
    /// +Y face.
    PositiveY = 2,
    /// -Y face.
    NegativeY = 3,
    /// +Z face.
    PositiveZ = 4,
    /// -Z face.
    NegativeZ = 5,
}

/// A cube map: six 2D faces sampled by direction vector.
#[derive(Debug, Clone)]
pub struct CubeTexture {
    /// Faces in the order +X, -X, +Y, -Y, +Z, -Z.
    pub faces: [Texture2D; 6],
}

impl CubeTexture {
    /// Create a cube map from six faces in the order
    /// +X, -X, +Y, -Y, +Z, -Z.
    pub fn new(faces: [Texture2D; 6]) -> Self {
        Self { faces }
    }

    /// Sample the cube map in the given direction.
    ///
    /// The dominant axis of the direction selects the face, and the other
    /// two components map to (u, v) per the standard six-face convention.
    pub fn sample(&self, direction: &Vector3) -> Color {
        let d = direction.normalized();
        let abs = d.abs();

        let (face, u, v) = if abs.x >= abs.y && abs.x >= abs.z {
            if d.x > 0.0 {
                (CubeFace::PositiveX, (-d.z / abs.x + 1.0) * 0.5, (-d.y / abs.x + 1.0) * 0.5)
            } else {
                (CubeFace::NegativeX, (d.z / abs.x + 1.0) * 0.5, (-d.y / abs.x + 1.0) * 0.5)
            }
        } else if abs.y >= abs.z {
            if d.y > 0.0 {
                (CubeFace::PositiveY, (d.x / abs.y + 1.0) * 0.5, (d.z / abs.y + 1.0) * 0.5)
            } else {
                (CubeFace::NegativeY, (d.x / abs.y + 1.0) * 0.5, (-d.z / abs.y + 1.0) * 0.5)
            }
        } else if d.z > 0.0 {
            (CubeFace::PositiveZ, (d.x / abs.z + 1.0) * 0.5, (-d.y / abs.z + 1.0) * 0.5)
        } else {
            (CubeFace::NegativeZ, (-d.x / abs.z + 1.0) * 0.5, (-d.y / abs.z + 1.0) * 0.5)
        };

        self.faces[face as usize].sample(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored_cube() -> CubeTexture {
        let colors = [
            Color::RED,
            Color::GREEN,
            Color::BLUE,
            Color::new(1.0, 1.0, 0.0, 1.0),
            Color::new(0.0, 1.0, 1.0, 1.0),
            Color::new(1.0, 0.0, 1.0, 1.0),
        ];
        CubeTexture::new(colors.map(|c| Texture2D::solid(4, 4, c).unwrap()))
    }

    #[test]
    fn test_dominant_axis_selection() {
        let cube = colored_cube();
        assert_eq!(cube.sample(&Vector3::new(5.0, 0.1, -0.1)), Color::RED);
        assert_eq!(cube.sample(&Vector3::new(-5.0, 0.1, 0.1)), Color::GREEN);
        assert_eq!(cube.sample(&Vector3::new(0.0, 2.0, 0.5)), Color::BLUE);
        assert_eq!(
            cube.sample(&Vector3::new(0.0, -2.0, 0.5)),
            Color::new(1.0, 1.0, 0.0, 1.0)
        );
        assert_eq!(
            cube.sample(&Vector3::new(0.1, 0.0, 3.0)),
            Color::new(0.0, 1.0, 1.0, 1.0)
        );
        assert_eq!(
            cube.sample(&Vector3::new(0.1, 0.0, -3.0)),
            Color::new(1.0, 0.0, 1.0, 1.0)
        );
    }
}
