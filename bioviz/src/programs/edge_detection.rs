use encase::ShaderType;
use glam::{UVec2, Vec4};
use wgpu::{
    BindGroupLayout, BlendState, Device, PipelineLayoutDescriptor, RenderPipeline, SamplerBindingType,
    ShaderStages, TextureSampleType,
};

use crate::{
    programs::{create_shader_module, quad_pipeline},
    render_target::SCENE_COLOR_FORMAT,
    shader::{NoConfig, ShaderPreProcessor},
    util::bind_merge::BindGroupLayoutBuilder,
};

#[derive(Debug, Clone, PartialEq, ShaderType)]
pub struct EdgeDetectionUniforms {
    pub rim_rgba: Vec4,
    /// Sobel sample offset in texture coordinates.
    pub rim_thickness: f32,
}

impl EdgeDetectionUniforms {
    pub fn new(rim_rgba: Vec4, size: UVec2) -> Self {
        Self {
            rim_rgba,
            rim_thickness: rim_thickness(size),
        }
    }
}

/// Two texels of the larger dimension.
pub fn rim_thickness(size: UVec2) -> f32 {
    2.0 / size.max_element().max(1) as f32
}

/// Runs a Sobel filter over the rim alpha channel of the resolved passthrough
/// output and blends the resulting rims over the scene.
pub struct EdgeDetectionShader {
    bgl: BindGroupLayout,
    pipeline: RenderPipeline,
}

impl EdgeDetectionShader {
    pub fn new(device: &Device, preprocessor: &ShaderPreProcessor) -> Self {
        profiling::scope!("EdgeDetectionShader::new");

        let bgl = BindGroupLayoutBuilder::new()
            .append_texture(TextureSampleType::Float { filterable: true }, false)
            .append_sampler(SamplerBindingType::Filtering)
            .append_uniform(ShaderStages::FRAGMENT, EdgeDetectionUniforms::min_size())
            .build(device, Some("edge detection bgl"));

        let module = create_shader_module(device, preprocessor, "edge_detection.wgsl", &NoConfig {});
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("edge detection"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = quad_pipeline(
            device,
            "edge detection",
            &module,
            &layout,
            SCENE_COLOR_FORMAT,
            Some(BlendState::ALPHA_BLENDING),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_follows_larger_dimension() {
        assert_eq!(rim_thickness(UVec2::new(800, 600)), 2.0 / 800.0);
        assert_eq!(rim_thickness(UVec2::new(100, 400)), 2.0 / 400.0);
    }
}
