use glam::{IVec2, Mat4, UVec2, Vec3, Vec4};

/// Sample count of the multisampled scene attachments.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SampleCount {
    #[default]
    One = 1,
    Four = 4,
}

impl TryFrom<u8> for SampleCount {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::One,
            4 => Self::Four,
            v => return Err(v),
        })
    }
}

impl SampleCount {
    pub const ARRAY: [Self; 2] = [Self::One, Self::Four];

    /// Determines if a resolve texture is needed for this texture.
    pub const fn needs_resolve(self) -> bool {
        !matches!(self, Self::One)
    }

    pub const fn get(self) -> u32 {
        self as u32
    }
}

bitflags::bitflags! {
    /// Which stages of the frame pipeline run.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RenderFlags: u32 {
        /// Draw the scene with polygon mode `Line`. Ignored, with a warning,
        /// on devices without line polygon support.
        const WIREFRAME_MODE = 1 << 0;
        /// Draw a short line along every vertex normal.
        const SHOW_MESH_NORMALS = 1 << 1;
        const DRAW_RIMS = 1 << 2;
        /// Draw colormapped previews of the passthrough output in the corner.
        const DRAW_DEBUG_QUADS = 1 << 3;
        const PERFORM_PASSTHROUGH_HIT_TEST = 1 << 4;
        /// Report the hit test result one frame late instead of stalling on
        /// the GPU.
        const USE_OPTIMIZED_BUT_DELAYED_1_FRAME_HIT_TEST = 1 << 5;
        const DRAW_SCENE_GEOMETRY = 1 << 6;
        /// Draw runs of instances sharing mesh and texture with one call
        /// each. Without it every instance gets its own draw call.
        const USE_INSTANCED_RENDERER = 1 << 7;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::DRAW_RIMS
            | Self::DRAW_SCENE_GEOMETRY
            | Self::USE_INSTANCED_RENDERER
            | Self::PERFORM_PASSTHROUGH_HIT_TEST
            | Self::USE_OPTIMIZED_BUT_DELAYED_1_FRAME_HIT_TEST
    }
}

/// Everything the renderer needs to know about a frame besides the drawlist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderParams {
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    /// World space position of the viewer, used for specular highlights.
    pub view_pos: Vec3,
    /// World space position of the point light.
    pub light_pos: Vec3,
    pub light_rgb: Vec3,
    pub background_rgba: Vec4,
    pub rim_rgba: Vec4,
    /// Pixel to hit test, with the origin at the top-left of the target.
    pub hittest: IVec2,
    pub flags: RenderFlags,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_pos: Vec3::ZERO,
            light_pos: Vec3::new(1.5, 3.0, 0.0),
            light_rgb: Vec3::new(248.0 / 255.0, 247.0 / 255.0, 247.0 / 255.0),
            background_rgba: Vec4::new(0.89, 0.89, 0.89, 1.0),
            rim_rgba: Vec4::new(1.0, 0.4, 0.0, 0.85),
            hittest: IVec2::new(-1, -1),
            flags: RenderFlags::default(),
        }
    }
}

impl RenderParams {
    /// The hit test pixel, if the hit test is enabled and the coordinate lies
    /// inside a target of `size`.
    pub fn hittest_pixel(&self, size: UVec2) -> Option<UVec2> {
        if !self.flags.contains(RenderFlags::PERFORM_PASSTHROUGH_HIT_TEST) {
            return None;
        }
        let x = u32::try_from(self.hittest.x).ok()?;
        let y = u32::try_from(self.hittest.y).ok()?;
        (x < size.x && y < size.y).then_some(UVec2::new(x, y))
    }

    pub fn instanced(&self) -> bool {
        self.flags.contains(RenderFlags::USE_INSTANCED_RENDERER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_from_u8() {
        assert_eq!(SampleCount::try_from(4), Ok(SampleCount::Four));
        assert_eq!(SampleCount::try_from(1), Ok(SampleCount::One));
        assert_eq!(SampleCount::try_from(8), Err(8));
        assert!(SampleCount::Four.needs_resolve());
        assert!(!SampleCount::One.needs_resolve());
    }

    #[test]
    fn hittest_pixel_bounds() {
        let size = UVec2::new(64, 32);
        let mut params = RenderParams {
            hittest: IVec2::new(10, 20),
            ..Default::default()
        };
        assert_eq!(params.hittest_pixel(size), Some(UVec2::new(10, 20)));

        params.hittest = IVec2::new(-1, 5);
        assert_eq!(params.hittest_pixel(size), None);

        params.hittest = IVec2::new(63, 32);
        assert_eq!(params.hittest_pixel(size), None);

        params.hittest = IVec2::new(63, 31);
        assert_eq!(params.hittest_pixel(size), Some(UVec2::new(63, 31)));

        params.flags.remove(RenderFlags::PERFORM_PASSTHROUGH_HIT_TEST);
        assert_eq!(params.hittest_pixel(size), None);
    }

    #[test]
    fn default_flags() {
        let flags = RenderFlags::default();
        assert!(flags.contains(RenderFlags::DRAW_SCENE_GEOMETRY | RenderFlags::USE_INSTANCED_RENDERER));
        assert!(!flags.contains(RenderFlags::WIREFRAME_MODE));
    }
}
