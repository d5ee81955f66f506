//! The mannequin figure.
//!
//! [`assemble_figure`] builds the fixed hierarchy:
//!
//! ```text
//! root (y = -5)
//! ├── head            sphere, normal material
//! └── body (y = +3)
//!     ├── torso       same sphere, scale 2
//!     ├── left_arm    box 3x1x1, green, x = +3
//!     ├── right_arm   copy of left_arm, x = -3
//!     ├── left_leg    copy of left_arm, rotated (90°, +70°), at (+1, 3, 0)
//!     └── right_leg   copy of left_arm, rotated (90°, -70°), at (-1, 3, 0)
//! ```
//!
//! Arms and legs share one box mesh and one material.

use glam::Vec3;
use tracing::info;

use mannequin_core::Result;

use crate::factory::SceneFactory;
use crate::light::PointLight;
use crate::material::Material;
use crate::node::SceneNode;
use crate::scene::Scene;
use crate::texture::Texture;
use crate::transform::Transform;

/// Node names of the figure's parts.
pub mod parts {
    pub const ROOT: &str = "root";
    pub const HEAD: &str = "head";
    pub const BODY: &str = "body";
    pub const TORSO: &str = "torso";
    pub const LEFT_ARM: &str = "left_arm";
    pub const RIGHT_ARM: &str = "right_arm";
    pub const LEFT_LEG: &str = "left_leg";
    pub const RIGHT_LEG: &str = "right_leg";
}

const ROOT_OFFSET_Y: f32 = -5.0;
const BODY_OFFSET_Y: f32 = 3.0;
const TORSO_SCALE: f32 = 2.0;
const SPHERE_RADIUS: f32 = 1.0;
const SPHERE_SEGMENTS: u32 = 10;
const LIMB_SIZE: Vec3 = Vec3::new(3.0, 1.0, 1.0);
const LIMB_COLOR: u32 = 0x00ff00;
const ARM_OFFSET_X: f32 = 3.0;
const LEG_OFFSET: Vec3 = Vec3::new(1.0, 3.0, 0.0);
const LEG_PITCH_DEGREES: f32 = 90.0;
const LEG_YAW_DEGREES: f32 = 70.0;

/// Build the figure hierarchy and return its root.
pub fn assemble_figure(factory: &mut impl SceneFactory) -> Result<SceneNode> {
    let sphere = factory.create_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)?;
    let skin = factory.create_material(Material::Normal)?;
    let limb = factory.create_box(LIMB_SIZE.x, LIMB_SIZE.y, LIMB_SIZE.z)?;
    let limb_material = factory.create_material(Material::basic(LIMB_COLOR))?;

    let head = SceneNode::mesh(sphere.clone(), skin.clone()).with_name(parts::HEAD);

    let torso = SceneNode::mesh(sphere, skin)
        .with_name(parts::TORSO)
        .with_transform(Transform::new().with_scale(Vec3::splat(TORSO_SCALE)));

    let left_arm = SceneNode::mesh(limb, limb_material)
        .with_name(parts::LEFT_ARM)
        .with_transform(Transform::new().with_position(Vec3::new(ARM_OFFSET_X, 0.0, 0.0)));
    let right_arm = mirrored(&left_arm, parts::RIGHT_ARM, Vec3::new(-ARM_OFFSET_X, 0.0, 0.0));

    let left_leg = leg(&left_arm, parts::LEFT_LEG, 1.0);
    let right_leg = leg(&left_arm, parts::RIGHT_LEG, -1.0);

    let body = SceneNode::new()
        .with_name(parts::BODY)
        .with_transform(Transform::new().with_position(Vec3::new(0.0, BODY_OFFSET_Y, 0.0)))
        .with_child(torso)
        .with_child(left_arm)
        .with_child(right_arm)
        .with_child(left_leg)
        .with_child(right_leg);

    let root = SceneNode::new()
        .with_name(parts::ROOT)
        .with_transform(Transform::new().with_position(Vec3::new(0.0, ROOT_OFFSET_Y, 0.0)))
        .with_child(head)
        .with_child(body);

    Ok(root)
}

/// Build the complete scene: the figure, an optional backdrop and a white
/// point light.
pub fn build_scene(factory: &mut impl SceneFactory, background: Option<Texture>) -> Result<Scene> {
    let root = assemble_figure(factory)?;
    info!("Assembled figure with {} nodes", root.node_count());

    let mut scene = Scene::new(root);
    scene.set_background(background);
    scene.add_light(PointLight::new(0xffffff, 3.0));
    Ok(scene)
}

/// Copy of `source` with a new name and position.
fn mirrored(source: &SceneNode, name: &str, position: Vec3) -> SceneNode {
    let mut node = source.clone().with_name(name);
    node.transform.position = position;
    node
}

/// Copy of the arm turned into a leg; `side` is +1 for left and -1 for right.
fn leg(arm: &SceneNode, name: &str, side: f32) -> SceneNode {
    let mut node = mirrored(arm, name, Vec3::new(side * LEG_OFFSET.x, LEG_OFFSET.y, LEG_OFFSET.z));
    node.transform.rotation = Vec3::new(
        LEG_PITCH_DEGREES.to_radians(),
        side * LEG_YAW_DEGREES.to_radians(),
        0.0,
    );
    node
}
