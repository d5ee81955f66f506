//! Light definitions for the scene.

use glam::Vec3;

/// A point light (omnidirectional).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    /// Light position in world space
    pub position: Vec3,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// Distance at which the light fades out, 0 for no limit
    pub distance: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 1.0,
            distance: 0.0,
        }
    }
}

impl PointLight {
    /// A light of the given packed `0xRRGGBB` colour and intensity at the origin.
    pub fn new(hex: u32, intensity: f32) -> Self {
        let c = crate::material::Color::from_hex(hex);
        Self {
            color: Vec3::new(c.r, c.g, c.b),
            intensity,
            ..Self::default()
        }
    }
}
