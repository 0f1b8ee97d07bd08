//! Scene rendering: traversal, culling, shader construction, submission.

use super::RenderContext;
use crate::math::Frustum;
use crate::scene::Scene;
use crate::shader::PbrShader;
use log::debug;
use std::sync::Arc;

/// Counters from one [`SceneRenderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Renderable nodes submitted to the rasterizer.
    pub nodes_drawn: usize,
    /// Renderable nodes rejected by frustum culling.
    pub nodes_culled: usize,
    /// Triangles submitted.
    pub triangles: usize,
}

/// Drives a scene through the rasterizer: collects renderable nodes,
/// culls against the camera frustum, builds a PBR shader per node, and
/// submits its mesh.
#[derive(Debug, Clone, Copy)]
pub struct SceneRenderer {
    /// Whether nodes outside the view frustum are skipped.
    pub frustum_culling: bool,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer {
    /// Create a renderer with frustum culling enabled.
    pub fn new() -> Self {
        Self { frustum_culling: true }
    }

    /// Create a renderer that submits every renderable node.
    pub fn without_culling() -> Self {
        Self { frustum_culling: false }
    }

    /// Render a scene through the context's rasterizer. Without an
    /// active camera this silently does nothing.
    pub fn render(&self, scene: &Scene, ctx: &mut RenderContext) -> RenderStats {
        let mut stats = RenderStats::default();
        let Some(camera) = scene.active_camera() else {
            return stats;
        };

        let camera_matrix = camera.projection_matrix() * camera.view_matrix();
        let frustum = Frustum::from_matrix(&camera_matrix);

        for node in scene.root.renderable_nodes() {
            let (Some(mesh), Some(material)) = (&node.mesh, &node.material) else {
                continue;
            };

            if self.frustum_culling {
                let world_bounds = node.world_transform().mul_box(&mesh.bounding_box());
                if !frustum.intersects_box(&world_bounds) {
                    stats.nodes_culled += 1;
                    continue;
                }
            }

            let final_matrix = camera_matrix * *node.world_transform();
            ctx.shader = Box::new(PbrShader::new(
                final_matrix,
                Arc::clone(material),
                scene.lights.clone(),
                camera.position,
            ));
            ctx.draw_mesh(mesh);

            stats.nodes_drawn += 1;
            stats.triangles += mesh.triangles.len();
        }

        debug!(
            "rendered {} nodes ({} triangles), culled {}",
            stats.nodes_drawn, stats.triangles, stats.nodes_culled
        );
        stats
    }
}
