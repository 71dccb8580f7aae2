use std::mem::size_of;

use encase::ShaderType;
use glam::{Mat4, Vec3};
use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, CompareFunction, Device, FragmentState, FrontFace,
    PipelineLayout, PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology, RenderPipeline,
    RenderPipelineDescriptor, ShaderModule, VertexBufferLayout, VertexState, VertexStepMode,
};

use crate::{
    programs::{create_shader_module, multisample_state, scene_depth_state},
    render_target::{PASSTHROUGH_FORMAT, SCENE_COLOR_FORMAT},
    shader::{NoConfig, ShaderPreProcessor},
    types::{DrawInstance, RenderParams, SampleCount, VertexKind},
    util::typedefs::FastHashMap,
};

/// Per-frame uniforms shared by the scene and normals passes.
#[derive(Debug, Clone, PartialEq, ShaderType)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_pos: Vec3,
    pub light_pos: Vec3,
    pub light_color: Vec3,
}

impl FrameUniforms {
    pub fn new(params: &RenderParams) -> Self {
        Self {
            view: params.view_matrix,
            projection: params.projection_matrix,
            view_pos: params.view_pos,
            light_pos: params.light_pos,
            light_color: params.light_rgb,
        }
    }
}

/// Selects one of the scene pipelines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GouraudKey {
    pub vertex: VertexKind,
    pub samples: SampleCount,
    pub wireframe: bool,
}

pub(crate) fn instance_vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: size_of::<DrawInstance>() as u64,
        step_mode: VertexStepMode::Instance,
        attributes: &DrawInstance::ATTRIBUTES,
    }
}

/// Instanced Gouraud shading writing two outputs: the alpha-blended scene
/// color, and the unblended passthrough payload.
pub struct GouraudShader {
    module: ShaderModule,
    pipeline_layout: PipelineLayout,
    pipelines: FastHashMap<GouraudKey, RenderPipeline>,
    supports_wireframe: bool,
}

impl GouraudShader {
    pub fn new(
        device: &Device,
        preprocessor: &ShaderPreProcessor,
        frame_bgl: &BindGroupLayout,
        texture_bgl: &BindGroupLayout,
        supports_wireframe: bool,
    ) -> Self {
        profiling::scope!("GouraudShader::new");

        let module = create_shader_module(device, preprocessor, "gouraud_mrt.wgsl", &NoConfig {});
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("gouraud mrt"),
            bind_group_layouts: &[frame_bgl, texture_bgl],
            push_constant_ranges: &[],
        });

        let mut this = Self {
            module,
            pipeline_layout,
            pipelines: FastHashMap::default(),
            supports_wireframe,
        };

        let wireframe_modes: &[bool] = if supports_wireframe { &[false, true] } else { &[false] };
        for vertex in VertexKind::ARRAY {
            for samples in SampleCount::ARRAY {
                for &wireframe in wireframe_modes {
                    let key = GouraudKey {
                        vertex,
                        samples,
                        wireframe,
                    };
                    let pipeline = this.create_pipeline(device, key);
                    this.pipelines.insert(key, pipeline);
                }
            }
        }

        this
    }

    fn create_pipeline(&self, device: &Device, key: GouraudKey) -> RenderPipeline {
        let buffers = [
            VertexBufferLayout {
                array_stride: key.vertex.stride(),
                step_mode: VertexStepMode::Vertex,
                attributes: key.vertex.attributes(),
            },
            instance_vertex_layout(),
        ];

        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("gouraud mrt"),
            layout: Some(&self.pipeline_layout),
            vertex: VertexState {
                module: &self.module,
                entry_point: match key.vertex {
                    VertexKind::Untextured => "vs_untextured",
                    VertexKind::Textured => "vs_textured",
                },
                buffers: &buffers,
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: if key.wireframe { PolygonMode::Line } else { PolygonMode::Fill },
                conservative: false,
            },
            depth_stencil: Some(scene_depth_state(CompareFunction::Less)),
            multisample: multisample_state(key.samples),
            fragment: Some(FragmentState {
                module: &self.module,
                entry_point: "fs_main",
                targets: &[
                    Some(ColorTargetState {
                        format: SCENE_COLOR_FORMAT,
                        blend: Some(BlendState::ALPHA_BLENDING),
                        write_mask: ColorWrites::ALL,
                    }),
                    Some(ColorTargetState {
                        format: PASSTHROUGH_FORMAT,
                        blend: None,
                        write_mask: ColorWrites::ALL,
                    }),
                ],
            }),
            multiview: None,
        })
    }

    pub fn supports_wireframe(&self) -> bool {
        self.supports_wireframe
    }

    /// # Panics
    ///
    /// Panics when asked for a wireframe pipeline on a device without line
    /// polygon support.
    pub fn pipeline(&self, key: GouraudKey) -> &RenderPipeline {
        self.pipelines
            .get(&key)
            .unwrap_or_else(|| panic!("no gouraud pipeline for {key:?}"))
    }
}
