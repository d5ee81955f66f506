//! Integration tests for figure assembly.

use std::sync::Arc;

use glam::{Mat4, Vec3};

use mannequin_core::{Error, Result};
use mannequin_scene::{
    Geometry, Material, MeshFactory, SceneFactory, SceneNode, Transform, assemble_figure, parts,
};

/// Factory double that records every request and delegates the real work.
#[derive(Default)]
struct RecordingFactory {
    inner: MeshFactory,
    calls: Vec<String>,
}

impl SceneFactory for RecordingFactory {
    fn create_sphere(&mut self, radius: f32, w: u32, h: u32) -> Result<Arc<Geometry>> {
        self.calls.push(format!("sphere {} {} {}", radius, w, h));
        self.inner.create_sphere(radius, w, h)
    }

    fn create_box(&mut self, width: f32, height: f32, depth: f32) -> Result<Arc<Geometry>> {
        self.calls.push(format!("box {} {} {}", width, height, depth));
        self.inner.create_box(width, height, depth)
    }

    fn create_material(&mut self, material: Material) -> Result<Arc<Material>> {
        self.calls.push(format!("material {:?}", material));
        self.inner.create_material(material)
    }
}

/// Factory double whose geometry creation always fails.
struct BrokenFactory;

impl SceneFactory for BrokenFactory {
    fn create_sphere(&mut self, _: f32, _: u32, _: u32) -> Result<Arc<Geometry>> {
        Err(Error::InvalidGeometry("no backend".to_string()))
    }

    fn create_box(&mut self, _: f32, _: f32, _: f32) -> Result<Arc<Geometry>> {
        Err(Error::InvalidGeometry("no backend".to_string()))
    }

    fn create_material(&mut self, material: Material) -> Result<Arc<Material>> {
        Ok(Arc::new(material))
    }
}

/// Shape of a tree without node identities: (name, transform, children).
#[derive(Debug, PartialEq)]
struct Outline {
    name: Option<String>,
    transform: Transform,
    has_drawable: bool,
    children: Vec<Outline>,
}

fn outline(node: &SceneNode) -> Outline {
    Outline {
        name: node.name().map(str::to_owned),
        transform: node.transform,
        has_drawable: node.drawable().is_some(),
        children: node.children().iter().map(outline).collect(),
    }
}

fn ids(node: &SceneNode, out: &mut Vec<u64>) {
    out.push(node.id().raw());
    for child in node.children() {
        ids(child, out);
    }
}

#[test]
fn test_assembly_requests_each_resource_once() {
    let mut factory = RecordingFactory::default();
    assemble_figure(&mut factory).expect("assembly should succeed");

    assert_eq!(factory.calls.len(), 4);
    assert!(factory.calls.contains(&"sphere 1 10 10".to_string()));
    assert!(factory.calls.contains(&"box 3 1 1".to_string()));
    assert_eq!(
        factory
            .calls
            .iter()
            .filter(|c| c.starts_with("material"))
            .count(),
        2
    );
}

#[test]
fn test_assembly_is_deterministic() {
    let a = assemble_figure(&mut MeshFactory::new()).unwrap();
    let b = assemble_figure(&mut MeshFactory::new()).unwrap();

    assert_eq!(a.node_count(), b.node_count());
    assert_eq!(outline(&a), outline(&b));

    let (mut ids_a, mut ids_b) = (Vec::new(), Vec::new());
    ids(&a, &mut ids_a);
    ids(&b, &mut ids_b);
    for id in &ids_a {
        assert!(!ids_b.contains(id), "node id {} shared between trees", id);
    }
}

#[test]
fn test_factory_errors_abort_assembly() {
    match assemble_figure(&mut BrokenFactory) {
        Err(Error::InvalidGeometry(msg)) => assert_eq!(msg, "no backend"),
        other => panic!("expected InvalidGeometry, got {:?}", other.map(|n| n.node_count())),
    }
}

#[test]
fn test_world_positions() {
    let root = assemble_figure(&mut MeshFactory::new()).unwrap();
    let mut positions = Vec::new();
    root.walk(Mat4::IDENTITY, &mut |node: &SceneNode, world: Mat4| {
        if let Some(name) = node.name() {
            positions.push((name.to_owned(), world.transform_point3(Vec3::ZERO)));
        }
    });

    let find = |name: &str| {
        positions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
            .unwrap()
    };

    assert!((find(parts::HEAD) - Vec3::new(0.0, -5.0, 0.0)).length() < 1e-5);
    assert!((find(parts::TORSO) - Vec3::new(0.0, -2.0, 0.0)).length() < 1e-5);
    assert!((find(parts::LEFT_ARM) - Vec3::new(3.0, -2.0, 0.0)).length() < 1e-5);
    assert!((find(parts::RIGHT_LEG) - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_root_rotation_spins_children() {
    let mut root = assemble_figure(&mut MeshFactory::new()).unwrap();
    root.transform.rotation.y = std::f32::consts::PI;

    let mut arm_position = Vec3::ZERO;
    root.walk(Mat4::IDENTITY, &mut |node: &SceneNode, world: Mat4| {
        if node.name() == Some(parts::LEFT_ARM) {
            arm_position = world.transform_point3(Vec3::ZERO);
        }
    });

    // Half a turn about Y swings the left arm over to -X
    assert!((arm_position - Vec3::new(-3.0, -2.0, 0.0)).length() < 1e-4);
}
