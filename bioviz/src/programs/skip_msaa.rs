use serde::Serialize;
use wgpu::{BindGroupLayout, Device, PipelineLayoutDescriptor, RenderPipeline, TextureSampleType};

use crate::{
    programs::{create_shader_module, quad_pipeline},
    render_target::PASSTHROUGH_FORMAT,
    shader::ShaderPreProcessor,
    types::SampleCount,
    util::bind_merge::BindGroupLayoutBuilder,
};

#[derive(Serialize)]
struct BlitConfig {
    multisampled: bool,
}

struct BlitVariant {
    bgl: BindGroupLayout,
    pipeline: RenderPipeline,
}

/// Copies sample zero of the passthrough attachment into a single-sampled
/// texture, for the pixels around the hit test cursor.
pub struct SkipMsaaBlitter {
    one: BlitVariant,
    four: BlitVariant,
}

impl SkipMsaaBlitter {
    pub fn new(device: &Device, preprocessor: &ShaderPreProcessor) -> Self {
        profiling::scope!("SkipMsaaBlitter::new");

        let build = |multisampled: bool| {
            let bgl = BindGroupLayoutBuilder::new()
                .append_texture(TextureSampleType::Float { filterable: false }, multisampled)
                .build(device, Some("skip msaa blit bgl"));
            let module =
                create_shader_module(device, preprocessor, "skip_msaa_blit.wgsl", &BlitConfig { multisampled });
            let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("skip msaa blit"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            });
            let pipeline = quad_pipeline(device, "skip msaa blit", &module, &layout, PASSTHROUGH_FORMAT, None);
            BlitVariant { bgl, pipeline }
        };

        Self {
            one: build(false),
            four: build(true),
        }
    }

    fn variant(&self, samples: SampleCount) -> &BlitVariant {
        match samples {
            SampleCount::One => &self.one,
            SampleCount::Four => &self.four,
        }
    }

    pub fn bind_group_layout(&self, samples: SampleCount) -> &BindGroupLayout {
        &self.variant(samples).bgl
    }

    pub fn pipeline(&self, samples: SampleCount) -> &RenderPipeline {
        &self.variant(samples).pipeline
    }
}
