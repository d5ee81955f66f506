//! Application configuration.
//!
//! Everything the viewer needs is fixed at compile time; [`AppConfig`]
//! gathers those constants in one place so the app and the tests agree on
//! them.

use std::path::PathBuf;

use glam::Vec3;

/// Radians per millisecond applied to the root node.
pub const DEFAULT_ANGULAR_SPEED: f64 = 0.001;

/// Surface id the renderer looks up at startup.
pub const DEFAULT_SURFACE_ID: &str = "canvas";

/// Perspective camera parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Initial aspect ratio, replaced once the viewport is known
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 40.0,
            aspect: 2.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 20.0),
            target: Vec3::ZERO,
        }
    }
}

/// Top-level configuration for the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Window title shown before the first frame
    pub title: String,
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
    /// Id under which the drawable surface is registered
    pub surface_id: String,
    /// Background image, tiled behind the figure
    pub background: Option<PathBuf>,
    /// Root rotation speed in radians per millisecond
    pub angular_speed: f64,
    /// Colour used where no background texel covers the frame (0xRRGGBB)
    pub clear_color: u32,
    /// Camera settings
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Mannequin".to_string(),
            width: 800,
            height: 400,
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            background: Some(PathBuf::from("assets/wild-style.jpg")),
            angular_speed: DEFAULT_ANGULAR_SPEED,
            clear_color: 0x000000,
            camera: CameraConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_y_degrees, 40.0);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();
        assert_eq!(config.surface_id, "canvas");
        assert_eq!(config.angular_speed, 0.001);
        assert!(config.background.is_some());
    }
}
