//! Flattens the scene graph into the items one frame draws.
//!
//! Building the list is pure CPU work: it walks the graph, composes each
//! drawable's matrices and counts what it saw. The GPU side only uploads
//! and replays it.

use std::sync::Arc;

use glam::Mat4;
use tracing::trace;

use mannequin_scene::{Camera, Color, Geometry, Material, Scene, SceneNode, Texture};

use crate::ubo::ObjectUniforms;

/// Counters from one draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Scene nodes visited
    pub nodes: usize,
    /// Nodes carrying a drawable
    pub drawables: usize,
    /// Triangles submitted to the GPU
    pub triangles: usize,
}

/// One drawable with its per-frame uniforms.
#[derive(Clone, Debug)]
pub struct DrawItem {
    /// Shared mesh; identical `Arc`s share one set of GPU buffers.
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub uniforms: ObjectUniforms,
}

/// Everything needed to draw one frame, in depth-first scene order.
#[derive(Clone, Debug)]
pub struct DrawList<'a> {
    pub items: Vec<DrawItem>,
    /// Screen-space background; `None` clears to `clear_color`.
    pub background: Option<&'a Texture>,
    /// Opaque RGBA clear colour.
    pub clear_color: [f32; 4],
    pub stats: DrawStats,
}

impl<'a> DrawList<'a> {
    /// Walk `scene` as seen from `camera`.
    pub fn build(scene: &'a Scene, camera: &Camera, clear: Color) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let mut stats = DrawStats::default();
        let mut items = Vec::new();

        scene.root().walk(Mat4::IDENTITY, &mut |node: &SceneNode, world: Mat4| {
            stats.nodes += 1;
            if let Some(drawable) = node.drawable() {
                stats.drawables += 1;
                stats.triangles += drawable.geometry.triangle_count();
                items.push(DrawItem {
                    geometry: drawable.geometry.clone(),
                    material: *drawable.material,
                    uniforms: ObjectUniforms::new(view * world, projection, &drawable.material),
                });
            }
        });

        trace!(
            nodes = stats.nodes,
            drawables = stats.drawables,
            triangles = stats.triangles,
            "Draw list built"
        );

        Self {
            items,
            background: scene.background(),
            clear_color: [clear.r, clear.g, clear.b, 1.0],
            stats,
        }
    }

    /// An empty frame: no items, nothing counted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.background.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mannequin_scene::Transform;

    fn camera() -> Camera {
        let mut camera = Camera::perspective(40f32.to_radians(), 2.0, 0.1, 1000.0);
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn unit_box(material: Material) -> SceneNode {
        SceneNode::mesh(
            Arc::new(Geometry::cuboid(1.0, 1.0, 1.0).unwrap()),
            Arc::new(material),
        )
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::new(SceneNode::new());
        let list = DrawList::build(&scene, &camera(), Color::BLACK);
        assert!(list.is_empty());
        assert_eq!(
            list.stats,
            DrawStats {
                nodes: 1,
                drawables: 0,
                triangles: 0,
            }
        );
        assert_eq!(list.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_items_follow_depth_first_order() {
        let root = SceneNode::new()
            .with_child(unit_box(Material::Normal))
            .with_child(
                unit_box(Material::basic(0x00ff00))
                    .with_transform(Transform::new().with_position(Vec3::new(2.0, 0.0, 0.0))),
            );
        let scene = Scene::new(root);
        let list = DrawList::build(&scene, &camera(), Color::BLACK);

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].material, Material::Normal);
        assert_eq!(list.items[1].material, Material::basic(0x00ff00));
        assert_eq!(list.stats.nodes, 3);
        assert_eq!(list.stats.drawables, 2);
        assert_eq!(list.stats.triangles, 24);
    }

    #[test]
    fn test_child_inherits_parent_transform() {
        let child = unit_box(Material::Normal)
            .with_transform(Transform::new().with_position(Vec3::new(1.0, 0.0, 0.0)));
        let root = SceneNode::new()
            .with_transform(Transform::new().with_position(Vec3::new(0.0, 2.0, 0.0)))
            .with_child(child);
        let scene = Scene::new(root);
        let camera = camera();
        let list = DrawList::build(&scene, &camera, Color::BLACK);

        let expected = camera.view_projection_matrix().project_point3(Vec3::new(1.0, 2.0, 0.0));
        let actual = list.items[0].uniforms.project(Vec3::ZERO);
        assert!(actual.abs_diff_eq(expected, 1e-5), "{actual} != {expected}");
    }

    #[test]
    fn test_background_and_clear_color() {
        let mut scene = Scene::new(SceneNode::new());
        scene.set_background(Some(Texture::solid(0xff336699)));
        let list = DrawList::build(&scene, &camera(), Color::from_hex(0x0000ff));
        assert!(!list.is_empty());
        assert_eq!(list.background.map(Texture::width), Some(1));
        assert_eq!(list.clear_color, [0.0, 0.0, 1.0, 1.0]);
    }
}
