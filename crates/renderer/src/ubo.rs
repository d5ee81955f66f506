//! Uniform block layout shared with `shaders/mesh.wgsl`.
//!
//! The struct is `#[repr(C)]` and `Pod` so it can be copied into the uniform
//! buffer byte for byte.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

use mannequin_scene::Material;

/// Flips clip-space y so a y-up camera lands upright in Vulkan's y-down
/// framebuffer.
pub const CLIP_Y_FLIP: Mat4 = Mat4::from_cols(Vec4::X, Vec4::NEG_Y, Vec4::Z, Vec4::W);

/// Per-drawable uniform data.
///
/// # Memory Layout
///
/// - Offset 0: model-view-projection matrix (64 bytes)
/// - Offset 64: view-space normal matrix (64 bytes)
/// - Offset 128: material colour, opaque (16 bytes)
/// - Total size: 144 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Object space to clip space, y flipped for Vulkan.
    pub mvp: Mat4,
    /// Object-space normals to view space.
    pub normal_matrix: Mat4,
    /// Flat colour for [`Material::Basic`]; unused by the normal material.
    pub color: Vec4,
}

impl ObjectUniforms {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(model_view: Mat4, projection: Mat4, material: &Material) -> Self {
        let color = match material {
            Material::Basic { color } => Vec4::new(color.r, color.g, color.b, 1.0),
            Material::Normal => Vec4::ONE,
        };
        Self {
            mvp: CLIP_Y_FLIP * projection * model_view,
            normal_matrix: normal_matrix(model_view),
            color,
        }
    }

    /// Normalised device coordinates of an object-space point, y up.
    pub fn project(&self, point: Vec3) -> Vec3 {
        (CLIP_Y_FLIP * self.mvp).project_point3(point)
    }
}

/// Inverse-transpose of the upper 3x3, falling back to identity when singular.
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    let m = Mat3::from_mat4(model_view);
    if m.determinant().abs() < f32::EPSILON {
        Mat4::IDENTITY
    } else {
        Mat4::from_mat3(m.inverse().transpose())
    }
}

/// Distance between consecutive blocks in a dynamic uniform buffer.
///
/// Rounds `size` up to the device's `min_uniform_buffer_offset_alignment`;
/// an alignment of zero means no constraint.
pub fn dynamic_stride(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        size
    } else {
        size.div_ceil(alignment) * alignment
    }
}
