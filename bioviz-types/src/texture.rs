use glam::UVec2;
use thiserror::Error;

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureWrap {
    #[default]
    Repeat,
    MirrorRepeat,
    ClampToEdge,
}

impl From<TextureWrap> for wgt::AddressMode {
    fn from(value: TextureWrap) -> Self {
        match value {
            TextureWrap::Repeat => Self::Repeat,
            TextureWrap::MirrorRepeat => Self::MirrorRepeat,
            TextureWrap::ClampToEdge => Self::ClampToEdge,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

impl From<TextureFilter> for wgt::FilterMode {
    fn from(value: TextureFilter) -> Self {
        match value {
            TextureFilter::Nearest => Self::Nearest,
            TextureFilter::Linear => Self::Linear,
        }
    }
}

/// Error returned from texture validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureValidationError {
    #[error("Texture has a zero sized dimension: {size}")]
    ZeroSize { size: UVec2 },
    #[error("Texture of size {size} with {channels} channels needs {expected} bytes but was given {actual}")]
    DataSizeMismatch {
        size: UVec2,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

/// CPU-side image data ready to be uploaded into a texture store.
///
/// Rows are stored top to bottom in RGBA8 order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub label: Option<String>,
    size: UVec2,
    data: Vec<u8>,
    /// Interpret the color data as sRGB encoded.
    pub srgb: bool,
    pub wrap: TextureWrap,
    pub filter: TextureFilter,
}

impl Texture {
    fn validate(size: UVec2, channels: usize, data: &[u8]) -> Result<(), TextureValidationError> {
        if size.x == 0 || size.y == 0 {
            return Err(TextureValidationError::ZeroSize { size });
        }
        let expected = size.x as usize * size.y as usize * channels;
        if data.len() != expected {
            return Err(TextureValidationError::DataSizeMismatch {
                size,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }

    pub fn from_rgba8(size: UVec2, data: Vec<u8>) -> Result<Self, TextureValidationError> {
        Self::validate(size, 4, &data)?;
        Ok(Self {
            label: None,
            size,
            data,
            srgb: false,
            wrap: TextureWrap::default(),
            filter: TextureFilter::default(),
        })
    }

    /// Expands tightly packed RGB8 data to RGBA8 with an opaque alpha.
    pub fn from_rgb8(size: UVec2, data: &[u8]) -> Result<Self, TextureValidationError> {
        Self::validate(size, 3, data)?;
        let rgba = data
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 0xff])
            .collect();
        Self::from_rgba8(size, rgba)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    pub fn with_wrap(mut self, wrap: TextureWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> wgt::TextureFormat {
        if self.srgb {
            wgt::TextureFormat::Rgba8UnormSrgb
        } else {
            wgt::TextureFormat::Rgba8Unorm
        }
    }
}
