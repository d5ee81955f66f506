//! The top-level scene: one root node, an optional backdrop and lights.

use crate::light::PointLight;
use crate::node::SceneNode;
use crate::texture::Texture;

/// Everything the renderer needs to draw a frame.
#[derive(Debug, Default)]
pub struct Scene {
    root: SceneNode,
    background: Option<Texture>,
    lights: Vec<PointLight>,
}

impl Scene {
    /// A scene rooted at `root` with no background and no lights.
    pub fn new(root: SceneNode) -> Self {
        Self {
            root,
            background: None,
            lights: Vec::new(),
        }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    pub fn background(&self) -> Option<&Texture> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, background: Option<Texture>) {
        self.background = background;
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }
}
