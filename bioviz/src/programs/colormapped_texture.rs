use encase::ShaderType;
use glam::{Mat4, Vec4};
use wgpu::{
    BindGroupLayout, Device, PipelineLayoutDescriptor, RenderPipeline, SamplerBindingType, ShaderStages,
    TextureSampleType,
};

use crate::{
    programs::{create_shader_module, quad_pipeline},
    render_target::SCENE_COLOR_FORMAT,
    shader::{NoConfig, ShaderPreProcessor},
    util::bind_merge::BindGroupLayoutBuilder,
};

#[derive(Debug, Clone, PartialEq, ShaderType)]
pub struct ColormappedUniforms {
    pub mvp: Mat4,
    /// Applied to every sampled texel before it is written out.
    pub sampler_multiplier: Mat4,
}

impl ColormappedUniforms {
    /// Copies rgba unchanged.
    pub const IDENTITY: Mat4 = Mat4::IDENTITY;
    /// Broadcasts the alpha channel to all four outputs.
    pub const ALPHA_TO_RGB: Mat4 = Mat4::from_cols(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ONE);
}

/// Samples a texture through a 4x4 color matrix. Used for the debug quads.
pub struct ColormappedTextureShader {
    bgl: BindGroupLayout,
    pipeline: RenderPipeline,
}

impl ColormappedTextureShader {
    pub fn new(device: &Device, preprocessor: &ShaderPreProcessor) -> Self {
        profiling::scope!("ColormappedTextureShader::new");

        let bgl = BindGroupLayoutBuilder::new()
            .append_texture(TextureSampleType::Float { filterable: true }, false)
            .append_sampler(SamplerBindingType::Filtering)
            .append_uniform(ShaderStages::VERTEX_FRAGMENT, ColormappedUniforms::min_size())
            .build(device, Some("colormapped texture bgl"));

        let module = create_shader_module(device, preprocessor, "colormapped_texture.wgsl", &NoConfig {});
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("colormapped texture"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = quad_pipeline(
            device,
            "colormapped texture",
            &module,
            &layout,
            SCENE_COLOR_FORMAT,
            None,
        );

        Self { bgl, pipeline }
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bgl
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }
}
