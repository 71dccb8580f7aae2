use wgpu::{
    BindGroupLayout, ColorTargetState, ColorWrites, CompareFunction, Device, FragmentState, FrontFace,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline,
    RenderPipelineDescriptor, VertexBufferLayout, VertexState, VertexStepMode,
};

use crate::{
    programs::{create_shader_module, gouraud::instance_vertex_layout, multisample_state, scene_depth_state},
    render_target::{PASSTHROUGH_FORMAT, SCENE_COLOR_FORMAT},
    shader::{NoConfig, ShaderPreProcessor},
    types::{SampleCount, UntexturedVertex, Vertex, VertexKind},
};

/// Draws one line per vertex along its normal.
///
/// Reads the duplicated-vertex normals buffer of each mesh and leaves the
/// passthrough output untouched.
pub struct NormalsShader {
    one: RenderPipeline,
    four: RenderPipeline,
}

impl NormalsShader {
    pub fn new(device: &Device, preprocessor: &ShaderPreProcessor, frame_bgl: &BindGroupLayout) -> Self {
        profiling::scope!("NormalsShader::new");

        let module = create_shader_module(device, preprocessor, "normals.wgsl", &NoConfig {});
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("normals"),
            bind_group_layouts: &[frame_bgl],
            push_constant_ranges: &[],
        });

        let build = |samples: SampleCount| {
            let buffers = [
                VertexBufferLayout {
                    array_stride: VertexKind::Untextured.stride(),
                    step_mode: VertexStepMode::Vertex,
                    attributes: UntexturedVertex::ATTRIBUTES,
                },
                instance_vertex_layout(),
            ];
            device.create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("normals"),
                layout: Some(&layout),
                vertex: VertexState {
                    module: &module,
                    entry_point: "vs_main",
                    buffers: &buffers,
                },
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::LineList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(scene_depth_state(CompareFunction::LessEqual)),
                multisample: multisample_state(samples),
                fragment: Some(FragmentState {
                    module: &module,
                    entry_point: "fs_main",
                    targets: &[
                        Some(ColorTargetState {
                            format: SCENE_COLOR_FORMAT,
                            blend: None,
                            write_mask: ColorWrites::ALL,
                        }),
                        Some(ColorTargetState {
                            format: PASSTHROUGH_FORMAT,
                            blend: None,
                            write_mask: ColorWrites::empty(),
                        }),
                    ],
                }),
                multiview: None,
            })
        };

        Self {
            one: build(SampleCount::One),
            four: build(SampleCount::Four),
        }
    }

    pub fn pipeline(&self, samples: SampleCount) -> &RenderPipeline {
        match samples {
            SampleCount::One => &self.one,
            SampleCount::Four => &self.four,
        }
    }
}
