//! Geometry and material construction behind a trait.
//!
//! The figure assembler only talks to [`SceneFactory`], so it can be run
//! against a recording double in tests.

use std::sync::Arc;

use tracing::debug;

use mannequin_core::Result;

use crate::geometry::Geometry;
use crate::material::Material;

/// Creates the shared resources scene nodes are built from.
pub trait SceneFactory {
    /// A UV sphere of the given radius and tessellation.
    fn create_sphere(
        &mut self,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Result<Arc<Geometry>>;

    /// An axis-aligned box of the given dimensions.
    fn create_box(&mut self, width: f32, height: f32, depth: f32) -> Result<Arc<Geometry>>;

    /// A shareable material.
    fn create_material(&mut self, material: Material) -> Result<Arc<Material>>;
}

/// Tessellates geometry on the CPU; the renderer uploads each mesh once.
#[derive(Debug, Default)]
pub struct MeshFactory;

impl MeshFactory {
    pub fn new() -> Self {
        Self
    }
}

impl SceneFactory for MeshFactory {
    fn create_sphere(
        &mut self,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Result<Arc<Geometry>> {
        let geometry = Geometry::sphere(radius, width_segments, height_segments)?;
        debug!(
            "Created sphere r={} ({}x{} segments, {} triangles)",
            radius,
            width_segments,
            height_segments,
            geometry.triangle_count()
        );
        Ok(Arc::new(geometry))
    }

    fn create_box(&mut self, width: f32, height: f32, depth: f32) -> Result<Arc<Geometry>> {
        let geometry = Geometry::cuboid(width, height, depth)?;
        debug!("Created box {}x{}x{}", width, height, depth);
        Ok(Arc::new(geometry))
    }

    fn create_material(&mut self, material: Material) -> Result<Arc<Material>> {
        debug!("Created material {:?}", material);
        Ok(Arc::new(material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;

    #[test]
    fn test_mesh_factory_builds_shapes() {
        let mut factory = MeshFactory::new();
        let sphere = factory.create_sphere(1.0, 10, 10).unwrap();
        let cuboid = factory.create_box(3.0, 1.0, 1.0).unwrap();

        assert!(matches!(sphere.shape(), Shape::Sphere { radius, .. } if radius == 1.0));
        assert!(matches!(cuboid.shape(), Shape::Cuboid { width, .. } if width == 3.0));
    }

    #[test]
    fn test_mesh_factory_propagates_errors() {
        let mut factory = MeshFactory::new();
        assert!(factory.create_sphere(1.0, 0, 10).is_err());
        assert!(factory.create_box(3.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_each_call_returns_independent_values() {
        let mut factory = MeshFactory::new();
        let a = factory.create_material(Material::Normal).unwrap();
        let b = factory.create_material(Material::Normal).unwrap();
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
