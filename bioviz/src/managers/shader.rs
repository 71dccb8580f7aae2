use encase::ShaderType;
use wgpu::{BindGroupLayout, Device, Features, ShaderStages};

use crate::{
    programs::{
        ColormappedTextureShader, EdgeDetectionShader, FrameUniforms, GouraudShader, NormalsShader,
        PlainTextureShader, SkipMsaaBlitter,
    },
    shader::ShaderPreProcessor,
    util::{bind_merge::BindGroupLayoutBuilder, error_scope::GpuErrorCheck},
};

/// The six shader programs, with every pipeline variant built up front.
pub struct ShaderStore {
    frame_bgl: BindGroupLayout,
    gouraud: GouraudShader,
    normals: NormalsShader,
    plain_texture: PlainTextureShader,
    colormapped_texture: ColormappedTextureShader,
    edge_detection: EdgeDetectionShader,
    skip_msaa_blitter: SkipMsaaBlitter,
}

impl ShaderStore {
    /// # Panics
    ///
    /// In debug builds, panics if any shader fails to compile or link.
    pub fn new(device: &Device, texture_bgl: &BindGroupLayout) -> Self {
        profiling::scope!("ShaderStore::new");

        let check = GpuErrorCheck::debug_only(device, "shader compilation");

        let preprocessor = ShaderPreProcessor::new();
        let frame_bgl = BindGroupLayoutBuilder::new()
            .append_uniform(ShaderStages::VERTEX, FrameUniforms::min_size())
            .build(device, Some("frame uniforms bgl"));
        let line_mode = device.features().contains(Features::POLYGON_MODE_LINE);

        let this = Self {
            gouraud: GouraudShader::new(device, &preprocessor, &frame_bgl, texture_bgl, line_mode),
            normals: NormalsShader::new(device, &preprocessor, &frame_bgl),
            plain_texture: PlainTextureShader::new(device, &preprocessor),
            colormapped_texture: ColormappedTextureShader::new(device, &preprocessor),
            edge_detection: EdgeDetectionShader::new(device, &preprocessor),
            skip_msaa_blitter: SkipMsaaBlitter::new(device, &preprocessor),
            frame_bgl,
        };

        check.end();

        this
    }

    /// Layout of group 0 of the scene and normals passes.
    pub fn frame_bind_group_layout(&self) -> &BindGroupLayout {
        &self.frame_bgl
    }

    pub fn gouraud(&self) -> &GouraudShader {
        &self.gouraud
    }

    pub fn normals(&self) -> &NormalsShader {
        &self.normals
    }

    pub fn plain_texture(&self) -> &PlainTextureShader {
        &self.plain_texture
    }

    pub fn colormapped_texture(&self) -> &ColormappedTextureShader {
        &self.colormapped_texture
    }

    pub fn edge_detection(&self) -> &EdgeDetectionShader {
        &self.edge_detection
    }

    pub fn skip_msaa_blitter(&self) -> &SkipMsaaBlitter {
        &self.skip_msaa_blitter
    }
}
