//! Scene graph and components.
//!
//! This crate provides scene management:
//! - Geometry and material descriptors, created through [`SceneFactory`]
//! - The node hierarchy and the [`Scene`] that owns it
//! - Camera and light definitions
//! - Background textures
//! - The mannequin figure assembler

pub mod camera;
pub mod factory;
pub mod figure;
pub mod geometry;
pub mod light;
pub mod material;
pub mod node;
pub mod scene;
pub mod texture;
pub mod transform;

pub use camera::Camera;
pub use factory::{MeshFactory, SceneFactory};
pub use figure::{assemble_figure, build_scene, parts};
pub use geometry::{Geometry, Shape, Vertex};
pub use light::PointLight;
pub use material::{Color, Material};
pub use node::{Drawable, NodeId, SceneNode};
pub use scene::Scene;
pub use texture::{Texture, WrapMode};
pub use transform::Transform;
