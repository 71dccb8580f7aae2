use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgt::{VertexAttribute, VertexFormat};

/// Shader location of the vertex position.
pub const ATTRIBUTE_LOCATION_POSITION: u32 = 0;
/// Shader location of the vertex normal.
pub const ATTRIBUTE_LOCATION_NORMAL: u32 = 1;
/// Shader location of the vertex texture coordinate.
pub const ATTRIBUTE_LOCATION_TEXCOORD: u32 = 2;

/// Which of the two vertex formats a mesh was uploaded with.
///
/// The renderer picks the Gouraud entry point from this, so a textured
/// pipeline is never used with geometry that lacks texture coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexKind {
    Untextured,
    Textured,
}

impl VertexKind {
    pub const ARRAY: [Self; 2] = [Self::Untextured, Self::Textured];

    pub const fn has_texcoord(self) -> bool {
        matches!(self, Self::Textured)
    }

    /// Stride of one vertex of this kind, in bytes.
    pub const fn stride(self) -> u64 {
        match self {
            Self::Untextured => size_of::<UntexturedVertex>() as u64,
            Self::Textured => size_of::<TexturedVertex>() as u64,
        }
    }

    pub const fn attributes(self) -> &'static [VertexAttribute] {
        match self {
            Self::Untextured => UntexturedVertex::ATTRIBUTES,
            Self::Textured => TexturedVertex::ATTRIBUTES,
        }
    }
}

/// A vertex format that can be uploaded into a mesh store.
///
/// The attribute table is what the pipelines bind, so implementors must keep
/// it in sync with their `#[repr(C)]` layout.
pub trait Vertex: Pod {
    const KIND: VertexKind;
    const ATTRIBUTES: &'static [VertexAttribute];

    fn position(&self) -> Vec3;
    fn normal(&self) -> Vec3;
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UntexturedVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl UntexturedVertex {
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

impl Vertex for UntexturedVertex {
    const KIND: VertexKind = VertexKind::Untextured;
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(UntexturedVertex, position) as u64,
            shader_location: ATTRIBUTE_LOCATION_POSITION,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(UntexturedVertex, normal) as u64,
            shader_location: ATTRIBUTE_LOCATION_NORMAL,
        },
    ];

    fn position(&self) -> Vec3 {
        self.position
    }

    fn normal(&self) -> Vec3 {
        self.normal
    }
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TexturedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Texture coordinate with the origin at the bottom-left of the image.
    pub texcoord: Vec2,
}

impl TexturedVertex {
    pub const fn new(position: Vec3, normal: Vec3, texcoord: Vec2) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

impl Vertex for TexturedVertex {
    const KIND: VertexKind = VertexKind::Textured;
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(TexturedVertex, position) as u64,
            shader_location: ATTRIBUTE_LOCATION_POSITION,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: offset_of!(TexturedVertex, normal) as u64,
            shader_location: ATTRIBUTE_LOCATION_NORMAL,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: offset_of!(TexturedVertex, texcoord) as u64,
            shader_location: ATTRIBUTE_LOCATION_TEXCOORD,
        },
    ];

    fn position(&self) -> Vec3 {
        self.position
    }

    fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl From<TexturedVertex> for UntexturedVertex {
    fn from(v: TexturedVertex) -> Self {
        Self::new(v.position, v.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_location(attributes: &[VertexAttribute], location: u32) -> bool {
        attributes.iter().any(|a| a.shader_location == location)
    }

    #[test]
    fn texcoord_attribute_matches_kind() {
        for kind in VertexKind::ARRAY {
            assert_eq!(
                has_location(kind.attributes(), ATTRIBUTE_LOCATION_TEXCOORD),
                kind.has_texcoord(),
                "{kind:?}"
            );
            assert!(has_location(kind.attributes(), ATTRIBUTE_LOCATION_POSITION));
            assert!(has_location(kind.attributes(), ATTRIBUTE_LOCATION_NORMAL));
        }
    }

    #[test]
    fn attributes_stay_inside_stride() {
        for kind in VertexKind::ARRAY {
            for attribute in kind.attributes() {
                assert!(attribute.offset + attribute.format.size() <= kind.stride());
            }
        }
        assert_eq!(VertexKind::Untextured.stride(), 24);
        assert_eq!(VertexKind::Textured.stride(), 32);
    }
}
