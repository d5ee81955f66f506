//! Scene graph nodes.
//!
//! A [`SceneNode`] owns its children outright, so a scene is always a tree.
//! Geometry and material are shared through `Arc`: cloning a node copies the
//! subtree (with fresh [`NodeId`]s) but keeps pointing at the same meshes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;

use crate::geometry::Geometry;
use crate::material::Material;
use crate::transform::Transform;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A geometry paired with the material it is drawn with.
#[derive(Clone, Debug)]
pub struct Drawable {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
}

impl Drawable {
    pub fn new(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self { geometry, material }
    }

    /// True when both drawables point at the same geometry and material.
    pub fn shares_resources_with(&self, other: &Drawable) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry) && Arc::ptr_eq(&self.material, &other.material)
    }
}

/// A transform with an optional drawable and owned children.
#[derive(Debug)]
pub struct SceneNode {
    id: NodeId,
    name: Option<String>,
    /// Transform relative to the parent node
    pub transform: Transform,
    drawable: Option<Drawable>,
    children: Vec<SceneNode>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SceneNode {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::next(),
            name: self.name.clone(),
            transform: self.transform,
            drawable: self.drawable.clone(),
            children: self.children.clone(),
        }
    }
}

impl SceneNode {
    /// An empty group node with an identity transform.
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            name: None,
            transform: Transform::default(),
            drawable: None,
            children: Vec::new(),
        }
    }

    /// A node that draws `geometry` with `material`.
    pub fn mesh(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self::new().with_drawable(Drawable::new(geometry, material))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable);
        self
    }

    /// Attach a child, taking ownership of it.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        self.drawable.as_ref()
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Depth-first search for a node by name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Mutable depth-first search for a node by name.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    /// Visit every node depth-first with its world matrix.
    ///
    /// `parent_world` is the matrix of the space this node lives in; pass
    /// `Mat4::IDENTITY` for a root.
    pub fn walk<F>(&self, parent_world: Mat4, visit: &mut F)
    where
        F: FnMut(&SceneNode, Mat4),
    {
        let world = parent_world * self.transform.local_matrix();
        visit(self, world);
        for child in &self.children {
            child.walk(world, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_box() -> SceneNode {
        SceneNode::mesh(
            Arc::new(Geometry::cuboid(1.0, 1.0, 1.0).unwrap()),
            Arc::new(Material::basic(0xff0000)),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SceneNode::new();
        let b = SceneNode::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_is_deep_with_fresh_ids() {
        let parent = SceneNode::new()
            .with_name("parent")
            .with_child(unit_box().with_name("child"));
        let copy = parent.clone();

        assert_ne!(copy.id(), parent.id());
        assert_ne!(copy.children()[0].id(), parent.children()[0].id());
        assert_eq!(copy.name(), Some("parent"));
        assert_eq!(copy.node_count(), 2);
    }

    #[test]
    fn test_clone_shares_resources() {
        let original = unit_box();
        let copy = original.clone();
        let a = original.drawable().unwrap();
        let b = copy.drawable().unwrap();
        assert!(a.shares_resources_with(b));
    }

    #[test]
    fn test_clone_transform_is_independent() {
        let original = unit_box();
        let mut copy = original.clone();
        copy.transform.position.x = 5.0;
        assert_eq!(original.transform.position.x, 0.0);
    }

    #[test]
    fn test_find_and_find_mut() {
        let mut root = SceneNode::new()
            .with_name("root")
            .with_child(SceneNode::new().with_name("a").with_child(unit_box().with_name("b")));

        assert!(root.find("b").is_some());
        assert!(root.find("missing").is_none());

        root.find_mut("b").unwrap().transform.position.y = 2.0;
        assert_eq!(root.find("b").unwrap().transform.position.y, 2.0);
    }

    #[test]
    fn test_walk_accumulates_world_matrices() {
        let root = SceneNode::new()
            .with_transform(Transform::new().with_position(Vec3::new(0.0, -5.0, 0.0)))
            .with_child(
                SceneNode::new()
                    .with_name("child")
                    .with_transform(Transform::new().with_position(Vec3::new(0.0, 3.0, 0.0))),
            );

        let mut seen = Vec::new();
        root.walk(Mat4::IDENTITY, &mut |node: &SceneNode, world: Mat4| {
            seen.push((node.name().map(str::to_owned), world.transform_point3(Vec3::ZERO)));
        });

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(seen[1].0.as_deref(), Some("child"));
        assert_eq!(seen[1].1, Vec3::new(0.0, -2.0, 0.0));
    }
}
