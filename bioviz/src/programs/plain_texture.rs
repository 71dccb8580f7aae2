use encase::ShaderType;
use glam::Mat4;
use wgpu::{
    BindGroupLayout, BlendState, Device, PipelineLayoutDescriptor, RenderPipeline, SamplerBindingType,
    ShaderStages, TextureFormat, TextureSampleType,
};

use crate::{
    programs::{create_shader_module, quad_pipeline},
    shader::{NoConfig, ShaderPreProcessor},
    util::bind_merge::BindGroupLayoutBuilder,
};

/// Surface formats the present pipeline is prebuilt for.
pub const PRESENT_FORMATS: [TextureFormat; 4] = [
    TextureFormat::Bgra8UnormSrgb,
    TextureFormat::Rgba8UnormSrgb,
    TextureFormat::Bgra8Unorm,
    TextureFormat::Rgba8Unorm,
];

#[derive(Debug, Clone, PartialEq, ShaderType)]
pub struct PlainTextureUniforms {
    pub mvp: Mat4,
    /// Multiplies the texture coordinate, so values above one tile the
    /// texture.
    pub texture_scaler: f32,
}

impl Default for PlainTextureUniforms {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY,
            texture_scaler: 1.0,
        }
    }
}

/// Samples a texture onto a quad unchanged. Used to present the resolved
/// scene.
pub struct PlainTextureShader {
    bgl: BindGroupLayout,
    pipelines: Vec<(TextureFormat, RenderPipeline)>,
}

impl PlainTextureShader {
    pub fn new(device: &Device, preprocessor: &ShaderPreProcessor) -> Self {
        profiling::scope!("PlainTextureShader::new");

        let bgl = BindGroupLayoutBuilder::new()
            .append_texture(TextureSampleType::Float { filterable: true }, false)
            .append_sampler(SamplerBindingType::Filtering)
            .append_uniform(ShaderStages::VERTEX_FRAGMENT, PlainTextureUniforms::min_size())
            .build(device, Some("plain texture bgl"));

        let module = create_shader_module(device, preprocessor, "plain_texture.wgsl", &NoConfig {});
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("plain texture"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let pipelines = PRESENT_FORMATS
            .iter()
            .map(|&format| {
                let pipeline = quad_pipeline(
                    device,
                    "plain texture",
                    &module,
                    &layout,
                    format,
                    Some(BlendState::REPLACE),
                );
                (format, pipeline)
            })
            .collect();

        Self { bgl, pipelines }
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bgl
    }

    pub fn pipeline(&self, format: TextureFormat) -> Option<&RenderPipeline> {
        self.pipelines.iter().find(|(f, _)| *f == format).map(|(_, p)| p)
    }
}
