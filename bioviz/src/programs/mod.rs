//! The six fixed shader programs.
//!
//! Each program owns its shader module, bind group layout, pipeline layout
//! and every pipeline variant it can be drawn with. All of it is created up
//! front so that shader errors surface when the store is built.

use std::{borrow::Cow, mem::size_of};

use bioviz_types::{TexturedVertex, ATTRIBUTE_LOCATION_POSITION};
use serde::Serialize;
use wgpu::{
    BlendState, ColorTargetState, ColorWrites, CompareFunction, DepthBiasState, DepthStencilState, Device,
    FragmentState, FrontFace, MultisampleState, PipelineLayout, PolygonMode, PrimitiveState, PrimitiveTopology,
    RenderPipeline, RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource, StencilState,
    TextureFormat, VertexAttribute, VertexBufferLayout, VertexFormat, VertexState, VertexStepMode,
};

use crate::{render_target::DEPTH_FORMAT, shader::ShaderPreProcessor, types::SampleCount};

mod colormapped_texture;
mod edge_detection;
mod gouraud;
mod normals;
mod plain_texture;
mod skip_msaa;

pub use colormapped_texture::*;
pub use edge_detection::*;
pub use gouraud::*;
pub use normals::*;
pub use plain_texture::*;
pub use skip_msaa::*;

/// Quad shaders read the textured vertex layout but skip the normal.
const QUAD_TEXCOORD_LOCATION: u32 = 1;

const QUAD_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: std::mem::offset_of!(TexturedVertex, position) as u64,
        shader_location: ATTRIBUTE_LOCATION_POSITION,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: std::mem::offset_of!(TexturedVertex, texcoord) as u64,
        shader_location: QUAD_TEXCOORD_LOCATION,
    },
];

pub(crate) fn quad_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: size_of::<TexturedVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &QUAD_ATTRIBUTES,
    }
}

pub(crate) fn create_shader_module<T: Serialize>(
    device: &Device,
    preprocessor: &ShaderPreProcessor,
    name: &str,
    config: &T,
) -> ShaderModule {
    let source = preprocessor
        .render_shader(&format!("bioviz/{name}"), config)
        .unwrap_or_else(|e| panic!("failed to preprocess shader {name}: {e}"));
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some(name),
        source: ShaderSource::Wgsl(Cow::Owned(source)),
    })
}

pub(crate) fn scene_depth_state(compare: CompareFunction) -> DepthStencilState {
    DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: compare,
        stencil: StencilState::default(),
        bias: DepthBiasState::default(),
    }
}

pub(crate) fn multisample_state(samples: SampleCount) -> MultisampleState {
    MultisampleState {
        count: samples.get(),
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

/// Single-sampled pipeline drawing a textured quad with no depth attachment.
pub(crate) fn quad_pipeline(
    device: &Device,
    label: &str,
    module: &ShaderModule,
    layout: &PipelineLayout,
    format: TextureFormat,
    blend: Option<BlendState>,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: VertexState {
            module,
            entry_point: "vs_main",
            buffers: &[quad_vertex_layout()],
        },
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: MultisampleState::default(),
        fragment: Some(FragmentState {
            module,
            entry_point: "fs_main",
            targets: &[Some(ColorTargetState {
                format,
                blend,
                write_mask: ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}
