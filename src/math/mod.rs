//! Math kernels: vectors, matrices, boxes, planes, frustum, and color.

mod box3;
mod color;
mod frustum;
mod matrix4;
mod plane;
mod vector3;
mod vector4;

pub use box3::Box3;
pub use color::{linear_to_srgb, srgb_to_linear, Color};
pub use frustum::Frustum;
pub use matrix4::Matrix4;
pub use plane::Plane;
pub use vector3::Vector3;
pub use vector4::Vector4;
