//! Scene: node hierarchy, named catalogues, lights, and cameras.

use super::SceneNode;
use crate::camera::Camera;
use crate::core::{RenderContext, RenderStats, SceneRenderer};
use crate::geometry::Mesh;
use crate::light::Light;
use crate::material::PbrMaterial;
use crate::math::{Box3, Color, Vector3};
use crate::texture::Texture2D;
use std::collections::HashMap;
use std::sync::Arc;

/// A complete scene: a root node owning the hierarchy, catalogues of
/// named resources shared into nodes by handle, lights, and cameras.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Scene name.
    pub name: String,
    /// Root of the node hierarchy; always present.
    pub root: SceneNode,
    /// Scene cameras.
    pub cameras: Vec<Camera>,
    /// Lights applied to every renderable.
    pub lights: Vec<Light>,
    /// Material catalogue by name.
    pub materials: HashMap<String, Arc<PbrMaterial>>,
    /// Texture catalogue by name.
    pub textures: HashMap<String, Arc<Texture2D>>,
    /// Mesh catalogue by name.
    pub meshes: HashMap<String, Arc<Mesh>>,
    active_camera: Option<usize>,
}

impl Scene {
    /// Create an empty scene with a root node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: SceneNode::new("root"),
            ..Self::default()
        }
    }

    /// Add a camera; the first one added becomes active.
    pub fn add_camera(&mut self, camera: Camera) {
        self.cameras.push(camera);
        if self.active_camera.is_none() {
            self.active_camera = Some(self.cameras.len() - 1);
        }
    }

    /// Set the active camera by name. Returns whether one matched.
    pub fn set_active_camera(&mut self, name: &str) -> bool {
        if let Some(index) = self.cameras.iter().position(|c| c.name == name) {
            self.active_camera = Some(index);
            return true;
        }
        false
    }

    /// The active camera, if any.
    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|i| self.cameras.get(i))
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add a directional light.
    pub fn add_directional_light(&mut self, direction: Vector3, color: Color, intensity: f64) {
        self.add_light(Light::directional(direction, color, intensity));
    }

    /// Add a point light.
    pub fn add_point_light(
        &mut self,
        position: Vector3,
        color: Color,
        intensity: f64,
        range: f64,
    ) {
        self.add_light(Light::point(position, color, intensity, range));
    }

    /// Add a spot light.
    #[allow(clippy::too_many_arguments)]
    pub fn add_spot_light(
        &mut self,
        position: Vector3,
        direction: Vector3,
        color: Color,
        intensity: f64,
        range: f64,
        inner_cone: f64,
        outer_cone: f64,
    ) {
        self.add_light(Light::spot(
            position, direction, color, intensity, range, inner_cone, outer_cone,
        ));
    }

    /// Add an ambient light.
    pub fn add_ambient_light(&mut self, color: Color, intensity: f64) {
        self.add_light(Light::ambient(color, intensity));
    }

    /// Remove every light.
    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    /// Lights matching a predicate, e.g. `Light::is_ambient`.
    pub fn lights_matching<'a>(
        &'a self,
        predicate: impl Fn(&Light) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Light> {
        self.lights.iter().filter(move |light| predicate(light))
    }

    /// Depth-first search for a node by name.
    pub fn find_node(&self, name: &str) -> Option<&SceneNode> {
        self.root.find(name)
    }

    /// Register a material under a name.
    pub fn add_material(&mut self, name: impl Into<String>, material: PbrMaterial) -> Arc<PbrMaterial> {
        let material = Arc::new(material);
        self.materials.insert(name.into(), Arc::clone(&material));
        material
    }

    /// Look up a material by name.
    pub fn material(&self, name: &str) -> Option<Arc<PbrMaterial>> {
        self.materials.get(name).cloned()
    }

    /// Register a texture under a name.
    pub fn add_texture(&mut self, name: impl Into<String>, texture: Texture2D) -> Arc<Texture2D> {
        let texture = Arc::new(texture);
        self.textures.insert(name.into(), Arc::clone(&texture));
        texture
    }

    /// Look up a texture by name.
    pub fn texture(&self, name: &str) -> Option<Arc<Texture2D>> {
        self.textures.get(name).cloned()
    }

    /// Register a mesh under a name.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.insert(name.into(), Arc::clone(&mesh));
        mesh
    }

    /// Look up a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(name).cloned()
    }

    /// Create a node referencing a catalogued mesh and material. The node
    /// is returned for placement; missing names leave the slot empty.
    pub fn create_mesh_node(&self, name: impl Into<String>, mesh: &str, material: &str) -> SceneNode {
        let mut node = SceneNode::new(name);
        node.mesh = self.mesh(mesh);
        node.material = self.material(material);
        node
    }

    /// World-space bounds of every mesh in the hierarchy.
    pub fn bounds(&self) -> Box3 {
        let mut bounds = Box3::EMPTY;
        self.root.visit(&mut |node| {
            if let Some(mesh) = &node.mesh {
                bounds = bounds.extend(&node.world_transform().mul_box(&mesh.bounding_box()));
            }
        });
        bounds
    }

    /// Render this scene into a context with the default culling
    /// renderer.
    pub fn render_to(&self, ctx: &mut RenderContext) -> RenderStats {
        SceneRenderer::new().render(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;

    #[test]
    fn test_catalogue_handles_are_shared() {
        let mut scene = Scene::new("test");
        scene.add_mesh("cube", primitives::cube());
        scene.add_material("default", PbrMaterial::new());
        let node = scene.create_mesh_node("a", "cube", "default");
        let other = scene.create_mesh_node("b", "cube", "default");
        assert!(Arc::ptr_eq(
            node.mesh.as_ref().unwrap(),
            other.mesh.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_first_camera_becomes_active() {
        let mut scene = Scene::new("test");
        assert!(scene.active_camera().is_none());
        scene.add_camera(Camera::perspective(
            "main",
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::ZERO,
            Vector3::UP,
            std::f64::consts::FRAC_PI_4,
            1.0,
            0.1,
            100.0,
        ));
        scene.add_camera(Camera::perspective(
            "other",
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::ZERO,
            Vector3::UP,
            std::f64::consts::FRAC_PI_4,
            1.0,
            0.1,
            100.0,
        ));
        assert_eq!(scene.active_camera().unwrap().name, "main");
        assert!(scene.set_active_camera("other"));
        assert_eq!(scene.active_camera().unwrap().name, "other");
        assert!(!scene.set_active_camera("missing"));
    }

    #[test]
    fn test_light_filtering_and_node_lookup() {
        let mut scene = Scene::new("test");
        scene.add_directional_light(Vector3::new(0.0, -1.0, 0.0), Color::WHITE, 1.0);
        scene.add_ambient_light(Color::gray(0.1), 1.0);
        scene.add_point_light(Vector3::ZERO, Color::WHITE, 2.0, 5.0);
        assert_eq!(scene.lights_matching(Light::is_ambient).count(), 1);
        assert_eq!(scene.lights_matching(|l| !l.is_ambient()).count(), 2);

        scene.root.add_child(SceneNode::new("child"));
        assert!(scene.find_node("child").is_some());
        assert!(scene.find_node("missing").is_none());
    }

    #[test]
    fn test_scene_bounds() {
        let mut scene = Scene::new("test");
        scene.add_mesh("cube", primitives::cube());
        scene.add_material("default", PbrMaterial::new());
        let mut node = scene.create_mesh_node("a", "cube", "default");
        node.set_transform(crate::math::Matrix4::translation(Vector3::new(10.0, 0.0, 0.0)));
        scene.root.add_child(node);
        let bounds = scene.bounds();
        assert!((bounds.center().x - 10.0).abs() < 1e-12);
    }
}
