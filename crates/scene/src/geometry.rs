//! Shape descriptors and their triangle meshes.
//!
//! Geometry is immutable once built. Sphere tessellation uses the usual
//! latitude/longitude layout; boxes get four vertices per face so each face
//! keeps a flat normal. Triangles wind counter-clockwise seen from outside.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use mannequin_core::{Error, Result};

/// The parameters a geometry was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
}

/// A mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// An indexed triangle mesh together with the shape it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    shape: Shape,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Geometry {
    /// Build a UV sphere.
    ///
    /// Requires a positive radius, at least 3 width segments and at least 2
    /// height segments.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Self> {
        check_dimension("radius", radius)?;
        if width_segments < 3 {
            return Err(Error::InvalidGeometry(format!(
                "sphere needs at least 3 width segments, got {}",
                width_segments
            )));
        }
        if height_segments < 2 {
            return Err(Error::InvalidGeometry(format!(
                "sphere needs at least 2 height segments, got {}",
                height_segments
            )));
        }

        let columns = width_segments + 1;
        let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let normal = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                vertices.push(Vertex {
                    position: normal * radius,
                    normal,
                });
            }
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * columns + ix + 1;
                let b = iy * columns + ix;
                let c = (iy + 1) * columns + ix;
                let d = (iy + 1) * columns + ix + 1;
                // The pole rows collapse to a point, so skip their degenerate halves
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Ok(Self {
            shape: Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            },
            vertices,
            indices,
        })
    }

    /// Build an axis-aligned box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        check_dimension("depth", depth)?;

        let half = Vec3::new(width, height, depth) * 0.5;
        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            let center = normal * half;
            let (u, v) = (u * half, v * half);
            for corner in [center - u - v, center + u - v, center + u + v, center - u + v] {
                vertices.push(Vertex {
                    position: corner,
                    normal,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Ok(Self {
            shape: Shape::Cuboid {
                width,
                height,
                depth,
            },
            vertices,
            indices,
        })
    }

    /// The parameters this geometry was built from.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}

fn check_dimension(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}
