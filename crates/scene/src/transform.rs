//! Transform component for scene nodes.
//!
//! This module provides the [`Transform`] struct for representing position,
//! rotation, and scale of a node relative to its parent. Rotation is stored
//! as Euler angles so a single axis can be driven directly by the animation.
//!
//! # Example
//!
//! ```
//! use mannequin_scene::Transform;
//! use glam::Vec3;
//!
//! let t = Transform::new()
//!     .with_position(Vec3::new(0.0, -5.0, 0.0))
//!     .with_scale(Vec3::splat(2.0));
//!
//! let origin = t.local_matrix().transform_point3(Vec3::ZERO);
//! assert!((origin - Vec3::new(0.0, -5.0, 0.0)).length() < 1e-6);
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};

/// A transform representing position, rotation, and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Position relative to the parent node
    pub position: Vec3,
    /// Euler angles in radians, applied in X, Y, Z order
    pub rotation: Vec3,
    /// Scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with the given position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Create a transform with the given Euler rotation (radians).
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Create a transform with the given scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The rotation as a quaternion.
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Get the local transformation matrix.
    ///
    /// Scale is applied first, then rotation, then translation.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_transform_builder() {
        let t = Transform::new()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::splat(2.0));

        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_rotation_about_y() {
        let t = Transform::new().with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let p = t.local_matrix().transform_point3(Vec3::X);

        // +X rotated a quarter turn about +Y lands on -Z
        assert!(approx_eq_vec3(p, Vec3::new(0.0, 0.0, -1.0)), "got {:?}", p);
    }

    #[test]
    fn test_euler_order_is_xyz() {
        let rx = std::f32::consts::FRAC_PI_2;
        let ry = 70.0_f32.to_radians();
        let t = Transform::new().with_rotation(Vec3::new(rx, ry, 0.0));

        let expected = Mat4::from_rotation_x(rx) * Mat4::from_rotation_y(ry);
        let actual = t.local_matrix();
        for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert!((a - e).abs() < EPSILON);
        }
    }

    #[test]
    fn test_scale_then_translate() {
        let t = Transform::new()
            .with_position(Vec3::new(10.0, 0.0, 0.0))
            .with_scale(Vec3::splat(2.0));

        let p = t.local_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx_eq_vec3(p, Vec3::new(12.0, 0.0, 0.0)), "got {:?}", p);
    }
}
