//! Perspective camera.

use glam::{Mat4, Quat, Vec3};

use mannequin_core::CameraConfig;

/// A perspective camera for rendering the scene.
///
/// The projection matrix is cached; changing `fov_y`, `aspect`, `near` or
/// `far` takes effect after [`Camera::update_projection_matrix`].
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera rotation
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport width divided by height
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0_f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a perspective camera at the origin looking down -Z.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Create the camera described by a [`CameraConfig`].
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::perspective(
            config.fov_y_degrees.to_radians(),
            config.aspect,
            config.near,
            config.far,
        );
        camera.position = config.position;
        camera.look_at(config.target);
        camera
    }

    /// Update the aspect ratio and recompute the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Recompute the cached projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Get the projection matrix (depth range 0..1, +Y up).
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.rotation * Vec3::NEG_Z;
        let target = self.position + forward;
        Mat4::look_at_rh(self.position, target, self.rotation * Vec3::Y)
    }

    /// Get the view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Look at a target position.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward.length_squared() > 0.0 {
            self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_from_config() {
        let camera = Camera::from_config(&CameraConfig::default());
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(camera.aspect, 2.0);
        assert!((camera.fov_y - 40.0_f32.to_radians()).abs() < EPSILON);
        assert!((camera.forward() - Vec3::NEG_Z).length() < EPSILON);
    }

    #[test]
    fn test_set_aspect_updates_projection() {
        let mut camera = Camera::perspective(1.0, 1.0, 0.1, 100.0);
        let before = camera.projection_matrix();
        camera.set_aspect(2.0);
        let after = camera.projection_matrix();

        assert_ne!(before, after);
        assert_eq!(after, Mat4::perspective_rh(1.0, 2.0, 0.1, 100.0));
    }

    #[test]
    fn test_projection_is_cached() {
        let mut camera = Camera::perspective(1.0, 1.0, 0.1, 100.0);
        camera.aspect = 4.0;
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0)
        );
        camera.update_projection_matrix();
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(1.0, 4.0, 0.1, 100.0)
        );
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::from_config(&CameraConfig::default());
        let clip = camera.view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < EPSILON);
        assert!(ndc.y.abs() < EPSILON);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_look_at_sideways() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(10.0, 0.0, 0.0);
        camera.look_at(Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_X).length() < EPSILON);
    }
}
