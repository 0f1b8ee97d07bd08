//! Scene graph and scene container.

mod node;
#[allow(clippy::module_inception)]
mod scene;

pub use node::SceneNode;
pub use scene::Scene;
