use glam::{Mat4, UVec2, Vec3};
use wgpu::{
    BindGroup, Buffer, CommandEncoder, Device, LoadOp, Operations, Queue, RenderPass, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp,
};

use crate::{
    programs::{ColormappedUniforms, EdgeDetectionUniforms},
    render_target::RenderTextures,
    renderer::FrameStats,
    samplers::Samplers,
    storage::GpuStorage,
    types::RenderParams,
    util::{bind_merge::BindGroupBuilder, uniforms::write_uniform},
};

pub(super) struct OverlayArgs<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub storage: &'a GpuStorage,
    pub target: &'a RenderTextures,
    pub size: UVec2,
    pub samplers: &'a Samplers,
    pub quad: &'a Buffer,
}

/// Begins a pass drawing over the resolved scene color.
fn overlay_pass<'a>(encoder: &'a mut CommandEncoder, target: &'a RenderTextures, label: &str) -> RenderPass<'a> {
    encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(RenderPassColorAttachment {
            view: &target.resolved_scene.view,
            resolve_target: None,
            ops: Operations {
                load: LoadOp::Load,
                store: StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

/// Outlines every instance with a non-zero rim alpha.
pub(super) fn draw_rims(
    args: OverlayArgs<'_>,
    encoder: &mut CommandEncoder,
    uniforms: &Buffer,
    params: &RenderParams,
    stats: &mut FrameStats,
) {
    profiling::scope!("rims");

    let shader = args.storage.shaders.edge_detection();
    write_uniform(
        args.queue,
        uniforms,
        &EdgeDetectionUniforms::new(params.rim_rgba, args.size),
    );
    let bind_group = BindGroupBuilder::new()
        .append_texture_view(&args.target.resolved_passthrough.view)
        .append_sampler(&args.samplers.nearest)
        .append_buffer(uniforms)
        .build(args.device, Some("rims"), shader.bind_group_layout());

    let mut rpass = overlay_pass(encoder, args.target, "rims");
    rpass.set_pipeline(shader.pipeline());
    rpass.set_bind_group(0, &bind_group, &[]);
    rpass.set_vertex_buffer(0, args.quad.slice(..));
    rpass.draw(0..6, 0..1);
    drop(rpass);

    stats.overlay_draw_calls += 1;
}

/// Where a debug quad sits in clip space.
fn debug_quad_mvp(translation: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_scale(Vec3::new(0.2, 0.2, 1.0))
}

/// Draws the passthrough rgb channels and its alpha channel as two small
/// quads in the top right corner.
pub(super) fn draw_debug_quads(
    args: OverlayArgs<'_>,
    encoder: &mut CommandEncoder,
    uniforms: &[Buffer; 2],
    stats: &mut FrameStats,
) {
    profiling::scope!("debug quads");

    let shader = args.storage.shaders.colormapped_texture();
    let quads = [
        ColormappedUniforms {
            mvp: debug_quad_mvp(Vec3::new(0.8, 0.8, 0.0)),
            sampler_multiplier: ColormappedUniforms::IDENTITY,
        },
        ColormappedUniforms {
            mvp: debug_quad_mvp(Vec3::new(0.8, 0.4, 0.0)),
            sampler_multiplier: ColormappedUniforms::ALPHA_TO_RGB,
        },
    ];

    let bind_groups: Vec<BindGroup> = quads
        .iter()
        .zip(uniforms)
        .map(|(quad, buffer)| {
            write_uniform(args.queue, buffer, quad);
            BindGroupBuilder::new()
                .append_texture_view(&args.target.resolved_passthrough.view)
                .append_sampler(&args.samplers.linear)
                .append_buffer(buffer)
                .build(args.device, Some("debug quad"), shader.bind_group_layout())
        })
        .collect();

    let mut rpass = overlay_pass(encoder, args.target, "debug quads");
    rpass.set_pipeline(shader.pipeline());
    rpass.set_vertex_buffer(0, args.quad.slice(..));
    for bind_group in &bind_groups {
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..6, 0..1);
    }
    drop(rpass);

    stats.overlay_draw_calls += bind_groups.len() as u32;
}
