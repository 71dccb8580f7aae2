use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// An 8-bit-per-channel RGBA color.
///
/// When uploaded as an instance attribute it is normalized to `[0, 1]`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

impl Rgba32 {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00, 0xff);
    pub const TRANSPARENT: Self = Self::new(0x00, 0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts from floating point channels, clamping each into `[0, 1]`.
    pub fn from_f4(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(channel_to_u8(r), channel_to_u8(g), channel_to_u8(b), channel_to_u8(a))
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Self::from_f4(v.x, v.y, v.z, v.w)
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r as f32, self.g as f32, self.b as f32, self.a as f32) / 255.0
    }

    /// Unpacks `0xRRGGBBAA`.
    pub const fn from_u32(v: u32) -> Self {
        let [r, g, b, a] = v.to_be_bytes();
        Self::new(r, g, b, a)
    }

    /// Packs into `0xRRGGBBAA`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 0xff
    }
}

impl From<Vec4> for Rgba32 {
    fn from(v: Vec4) -> Self {
        Self::from_vec4(v)
    }
}

/// Two opaque bytes carried by every instance and written verbatim into the
/// passthrough render output. Hit tests read them back.
///
/// `(0, 0)` means "no instance".
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passthrough {
    pub b0: u8,
    pub b1: u8,
}

impl Passthrough {
    pub const NONE: Self = Self::new(0, 0);

    pub const fn new(b0: u8, b1: u8) -> Self {
        Self { b0, b1 }
    }

    /// `b0` holds the low byte.
    pub const fn from_u16(v: u16) -> Self {
        let [b0, b1] = v.to_le_bytes();
        Self::new(b0, b1)
    }

    pub const fn to_u16(self) -> u16 {
        u16::from_le_bytes([self.b0, self.b1])
    }

    pub const fn is_none(self) -> bool {
        self.b0 == 0 && self.b1 == 0
    }
}

impl From<u16> for Passthrough {
    fn from(v: u16) -> Self {
        Self::from_u16(v)
    }
}
