//! Scene graph node.

use crate::geometry::Mesh;
use crate::material::PbrMaterial;
use crate::math::{Matrix4, Vector3};
use std::sync::Arc;

/// A named node in the scene hierarchy.
///
/// Ownership runs strictly root to children: a node owns its subtree by
/// value, which makes the "a node has one parent" invariant structural.
/// Instead of a parent back-pointer each node caches its parent's world
/// matrix, so setting a local transform can eagerly recompute
/// `world = parent_world * local` for the whole subtree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, used for lookup.
    pub name: String,
    local_transform: Matrix4,
    world_transform: Matrix4,
    parent_world: Matrix4,
    children: Vec<SceneNode>,
    /// Mesh drawn at this node, shared from the scene catalogue.
    pub mesh: Option<Arc<Mesh>>,
    /// Material for the mesh, shared from the scene catalogue.
    pub material: Option<Arc<PbrMaterial>>,
    /// Invisible nodes (and their subtrees' renderables) are skipped.
    pub visible: bool,
    /// Whether the node casts shadows.
    pub cast_shadows: bool,
    /// Whether the node receives shadows.
    pub receive_shadows: bool,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new("")
    }
}

impl SceneNode {
    /// Create a node with identity transforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_transform: Matrix4::IDENTITY,
            world_transform: Matrix4::IDENTITY,
            parent_world: Matrix4::IDENTITY,
            children: Vec::new(),
            mesh: None,
            material: None,
            visible: true,
            cast_shadows: true,
            receive_shadows: true,
        }
    }

    /// The node's local transform.
    #[inline]
    pub fn local_transform(&self) -> &Matrix4 {
        &self.local_transform
    }

    /// The node's world transform.
    #[inline]
    pub fn world_transform(&self) -> &Matrix4 {
        &self.world_transform
    }

    /// World-space position of the node origin.
    pub fn world_position(&self) -> Vector3 {
        self.world_transform.mul_position(&Vector3::ZERO)
    }

    /// Replace the local transform and eagerly recompute world
    /// transforms for this node and all descendants.
    pub fn set_transform(&mut self, transform: Matrix4) {
        self.local_transform = transform;
        let parent_world = self.parent_world;
        self.propagate_world(&parent_world);
    }

    /// Translate the node (applied after its current local transform).
    pub fn translate(&mut self, translation: Vector3) {
        self.set_transform(self.local_transform.translate(translation));
    }

    /// Rotate the node around an axis (applied after its current local
    /// transform).
    pub fn rotate(&mut self, axis: Vector3, angle: f64) {
        self.set_transform(self.local_transform.rotate(axis, angle));
    }

    /// Scale the node (applied after its current local transform).
    pub fn scale(&mut self, scale: Vector3) {
        self.set_transform(self.local_transform.scale(scale));
    }

    fn propagate_world(&mut self, parent_world: &Matrix4) {
        self.parent_world = *parent_world;
        self.world_transform = *parent_world * self.local_transform;
        let world = self.world_transform;
        for child in &mut self.children {
            child.propagate_world(&world);
        }
    }

    /// Attach a child; its world transform is recomputed under this
    /// node. A node obtained via [`SceneNode::take_child`] can be
    /// re-attached anywhere, which is how reparenting works.
    pub fn add_child(&mut self, mut child: SceneNode) {
        let world = self.world_transform;
        child.propagate_world(&world);
        self.children.push(child);
    }

    /// Detach and return the first direct child with the given name.
    pub fn take_child(&mut self, name: &str) -> Option<SceneNode> {
        let index = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(index))
    }

    /// Direct children of this node.
    #[inline]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Mutable direct child by name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Depth-first search for a node by name, starting at this node.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first mutable search for a node by name.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Depth-first visit of this node and all descendants.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a SceneNode)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    /// Every visible node in the subtree holding both a mesh and a
    /// material.
    pub fn renderable_nodes(&self) -> Vec<&SceneNode> {
        let mut renderables = Vec::new();
        self.visit(&mut |node| {
            if node.visible && node.mesh.is_some() && node.material.is_some() {
                renderables.push(node);
            }
        });
        renderables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_transform_propagation() {
        let mut root = SceneNode::new("root");
        root.set_transform(Matrix4::translation(Vector3::new(1.0, 0.0, 0.0)));

        let mut child = SceneNode::new("child");
        child.set_transform(Matrix4::translation(Vector3::new(0.0, 2.0, 0.0)));
        root.add_child(child);

        let child = root.find("child").unwrap();
        assert!(child
            .world_position()
            .approx_eq(&Vector3::new(1.0, 2.0, 0.0), 1e-12));

        // Mutating the parent's local transform propagates down.
        root.set_transform(Matrix4::translation(Vector3::new(-5.0, 0.0, 0.0)));
        let child = root.find("child").unwrap();
        assert!(child
            .world_position()
            .approx_eq(&Vector3::new(-5.0, 2.0, 0.0), 1e-12));
    }

    #[test]
    fn test_deep_mutation_uses_cached_parent_world() {
        let mut root = SceneNode::new("root");
        root.set_transform(Matrix4::translation(Vector3::new(0.0, 0.0, 3.0)));
        root.add_child(SceneNode::new("child"));

        let child = root.child_mut("child").unwrap();
        child.set_transform(Matrix4::translation(Vector3::new(1.0, 0.0, 0.0)));
        assert!(child
            .world_position()
            .approx_eq(&Vector3::new(1.0, 0.0, 3.0), 1e-12));
    }

    #[test]
    fn test_reparent_preserves_world_for_equal_parents() {
        let transform = Matrix4::translation(Vector3::new(2.0, 0.0, 0.0));
        let mut a = SceneNode::new("a");
        a.set_transform(transform);
        let mut b = SceneNode::new("b");
        b.set_transform(transform);

        let mut child = SceneNode::new("child");
        child.set_transform(Matrix4::translation(Vector3::new(0.0, 1.0, 0.0)));
        a.add_child(child);
        let world_before = *a.find("child").unwrap().world_transform();

        let child = a.take_child("child").unwrap();
        assert!(a.find("child").is_none());
        b.add_child(child);
        let world_after = *b.find("child").unwrap().world_transform();
        assert!(world_before.approx_eq(&world_after, 1e-12));
    }

    #[test]
    fn test_renderable_requires_mesh_material_visible() {
        use crate::geometry::primitives;

        let mut root = SceneNode::new("root");
        let mut full = SceneNode::new("full");
        full.mesh = Some(Arc::new(primitives::cube()));
        full.material = Some(Arc::new(PbrMaterial::new()));
        root.add_child(full);

        let mut mesh_only = SceneNode::new("mesh_only");
        mesh_only.mesh = Some(Arc::new(primitives::cube()));
        root.add_child(mesh_only);

        let mut hidden = SceneNode::new("hidden");
        hidden.mesh = Some(Arc::new(primitives::cube()));
        hidden.material = Some(Arc::new(PbrMaterial::new()));
        hidden.visible = false;
        root.add_child(hidden);

        let renderables = root.renderable_nodes();
        assert_eq!(renderables.len(), 1);
        assert_eq!(renderables[0].name, "full");
    }
}
