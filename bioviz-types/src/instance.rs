use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use wgt::{VertexAttribute, VertexFormat};

use crate::{MeshHandle, Passthrough, Rgba32, TextureHandle};

/// First shader location of the four model matrix columns.
pub const ATTRIBUTE_LOCATION_MODEL: u32 = 3;
/// First shader location of the three normal matrix columns.
pub const ATTRIBUTE_LOCATION_NORMAL_MATRIX: u32 = 7;
/// Shader location of the instance color.
pub const ATTRIBUTE_LOCATION_RGBA: u32 = 10;
/// Shader location of `(b0, b1, rim_alpha, flags)`.
pub const ATTRIBUTE_LOCATION_PASSTHROUGH: u32 = 11;

bitflags::bitflags! {
    /// Per-instance rendering switches.
    ///
    /// Travels to the GPU in the alpha channel of the passthrough attribute,
    /// so values must stay below 0x100.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InstanceFlags: u8 {
        /// Output the instance color unlit.
        const SKIP_SHADING = 0x40;
        /// Treat the model matrix as mapping straight into clip space.
        const SKIP_VIEW_PROJECTION = 0x20;
    }
}

/// Inverse-transpose of the upper-left 3x3 of `model`.
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model).inverse().transpose()
}

/// One drawable instance, laid out exactly as the GPU reads it from the
/// per-instance vertex buffer.
///
/// The transform is stored as the four columns of the upper 3x4 of the model
/// matrix (the bottom row is implicitly `0 0 0 1`). The normal matrix is
/// derived once when the transform is set.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    transform: [Vec3; 4],
    normal_matrix: [Vec3; 3],
    pub color: Rgba32,
    pub passthrough: Passthrough,
    /// Strength of the selection rim around this instance. Zero means no rim.
    pub rim_alpha: u8,
    flags: u8,
    pub texture: TextureHandle,
    pub mesh: MeshHandle,
}

const _: () = assert!(size_of::<DrawInstance>() == 96);
const _: () = assert!(offset_of!(DrawInstance, color) == 84);
const _: () = assert!(offset_of!(DrawInstance, passthrough) + 3 == offset_of!(DrawInstance, flags));

impl DrawInstance {
    /// Vertex attributes of the per-instance buffer.
    pub const ATTRIBUTES: [VertexAttribute; 9] = {
        let model = offset_of!(DrawInstance, transform) as u64;
        let normal = offset_of!(DrawInstance, normal_matrix) as u64;
        let column = size_of::<Vec3>() as u64;
        [
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: model,
                shader_location: ATTRIBUTE_LOCATION_MODEL,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: model + column,
                shader_location: ATTRIBUTE_LOCATION_MODEL + 1,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: model + 2 * column,
                shader_location: ATTRIBUTE_LOCATION_MODEL + 2,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: model + 3 * column,
                shader_location: ATTRIBUTE_LOCATION_MODEL + 3,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: normal,
                shader_location: ATTRIBUTE_LOCATION_NORMAL_MATRIX,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: normal + column,
                shader_location: ATTRIBUTE_LOCATION_NORMAL_MATRIX + 1,
            },
            VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: normal + 2 * column,
                shader_location: ATTRIBUTE_LOCATION_NORMAL_MATRIX + 2,
            },
            VertexAttribute {
                format: VertexFormat::Unorm8x4,
                offset: offset_of!(DrawInstance, color) as u64,
                shader_location: ATTRIBUTE_LOCATION_RGBA,
            },
            VertexAttribute {
                format: VertexFormat::Unorm8x4,
                offset: offset_of!(DrawInstance, passthrough) as u64,
                shader_location: ATTRIBUTE_LOCATION_PASSTHROUGH,
            },
        ]
    };

    /// Creates an untextured instance with no passthrough, rim or flags.
    pub fn new(transform: Mat4, color: Rgba32, mesh: MeshHandle) -> Self {
        let mut instance = Self {
            transform: [Vec3::ZERO; 4],
            normal_matrix: [Vec3::ZERO; 3],
            color,
            passthrough: Passthrough::NONE,
            rim_alpha: 0,
            flags: 0,
            texture: TextureHandle::INVALID,
            mesh,
        };
        instance.set_transform(&transform);
        instance
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_passthrough(mut self, passthrough: Passthrough) -> Self {
        self.passthrough = passthrough;
        self
    }

    pub fn with_rim_alpha(mut self, rim_alpha: u8) -> Self {
        self.rim_alpha = rim_alpha;
        self
    }

    pub fn with_flags(mut self, flags: InstanceFlags) -> Self {
        self.flags = flags.bits();
        self
    }

    /// Sets the model matrix and recomputes the normal matrix from it.
    pub fn set_transform(&mut self, transform: &Mat4) {
        self.transform = [
            transform.x_axis.truncate(),
            transform.y_axis.truncate(),
            transform.z_axis.truncate(),
            transform.w_axis.truncate(),
        ];
        let normal = normal_matrix(transform);
        self.normal_matrix = [normal.x_axis, normal.y_axis, normal.z_axis];
    }

    pub fn transform(&self) -> Mat4 {
        let [x, y, z, w] = self.transform;
        Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), w.extend(1.0))
    }

    pub fn normal_matrix(&self) -> Mat3 {
        let [x, y, z] = self.normal_matrix;
        Mat3::from_cols(x, y, z)
    }

    pub fn flags(&self) -> InstanceFlags {
        InstanceFlags::from_bits_truncate(self.flags)
    }

    pub fn set_flags(&mut self, flags: InstanceFlags) {
        self.flags = flags.bits();
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec4};

    use super::*;

    #[test]
    fn normal_matrix_of_rotation_is_rotation() {
        let rotation = Mat4::from_quat(Quat::from_rotation_y(0.7));
        let n = normal_matrix(&rotation);
        assert!(n.abs_diff_eq(Mat3::from_mat4(rotation), 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(&model);
        assert!(n.mul_vec3(Vec3::X).abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn transform_round_trips_affine_matrix() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(0.3),
            Vec3::new(-4.0, 5.0, 6.0),
        );
        let instance = DrawInstance::new(model, Rgba32::WHITE, MeshHandle::from_index(0));
        assert!(instance.transform().abs_diff_eq(model, 1e-6));
        assert_eq!(instance.transform().row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn flags_share_a_word_with_passthrough() {
        let instance = DrawInstance::new(Mat4::IDENTITY, Rgba32::WHITE, MeshHandle::from_index(0))
            .with_passthrough(Passthrough::new(9, 8))
            .with_rim_alpha(7)
            .with_flags(InstanceFlags::SKIP_SHADING);
        let bytes = bytemuck::bytes_of(&instance);
        let passthrough = DrawInstance::ATTRIBUTES[8].offset as usize;
        assert_eq!(&bytes[passthrough..passthrough + 4], &[9, 8, 7, 0x40]);
        assert_eq!(instance.flags(), InstanceFlags::SKIP_SHADING);
    }

    #[test]
    fn attributes_do_not_overlap() {
        let mut ranges: Vec<_> = DrawInstance::ATTRIBUTES
            .iter()
            .map(|a| (a.offset, a.offset + a.format.size()))
            .collect();
        ranges.sort();
        for pair in ranges.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
        assert!(ranges.last().unwrap().1 <= size_of::<DrawInstance>() as u64);
    }

    #[test]
    fn bulk_copy_is_byte_exact() {
        let instances: Vec<_> = (0..100u16)
            .map(|i| {
                DrawInstance::new(
                    Mat4::from_translation(Vec3::new(i as f32, -(i as f32), 0.5)),
                    Rgba32::from_u32(0x0102_0304 * u32::from(i)),
                    MeshHandle::from_index(usize::from(i % 7)),
                )
                .with_passthrough(Passthrough::from_u16(i.wrapping_mul(641)))
                .with_rim_alpha(i as u8)
            })
            .collect();
        let bytes: Vec<u8> = bytemuck::cast_slice(&instances).to_vec();
        assert_eq!(bytes.len(), 96 * instances.len());
        let mut copied = vec![DrawInstance::zeroed(); instances.len()];
        bytemuck::cast_slice_mut(&mut copied).copy_from_slice(&bytes);
        assert_eq!(copied, instances);
    }
}
