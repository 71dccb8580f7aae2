use wgpu::{
    BindGroup, Buffer, Color, CommandEncoder, LoadOp, Operations, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp,
};

use crate::{
    batching::scene_runs,
    programs::GouraudKey,
    render_target::RenderTextures,
    renderer::FrameStats,
    storage::GpuStorage,
    types::{DrawInstance, RenderFlags, RenderParams, SampleCount},
};

pub(super) struct SceneArgs<'a> {
    pub storage: &'a GpuStorage,
    pub encoder: &'a mut CommandEncoder,
    pub target: &'a RenderTextures,
    pub samples: SampleCount,
    pub frame_bg: &'a BindGroup,
    pub instance_buffer: Option<&'a Buffer>,
    pub instances: &'a [DrawInstance],
    pub params: &'a RenderParams,
    pub wireframe: bool,
}

fn background(params: &RenderParams) -> Color {
    let c = params.background_rgba.as_dvec4();
    Color {
        r: c.x,
        g: c.y,
        b: c.z,
        a: c.w,
    }
}

/// Clears the multisampled attachments, then draws the scene geometry and
/// the normals overlay into them.
pub(super) fn draw_scene(args: SceneArgs<'_>, stats: &mut FrameStats) {
    profiling::scope!("scene pass");

    let mut rpass = args.encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some("scene"),
        color_attachments: &[
            Some(RenderPassColorAttachment {
                view: &args.target.scene.view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(background(args.params)),
                    store: StoreOp::Store,
                },
            }),
            Some(RenderPassColorAttachment {
                view: &args.target.passthrough.view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color::TRANSPARENT),
                    store: StoreOp::Store,
                },
            }),
        ],
        depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
            view: &args.target.depth.view,
            depth_ops: Some(Operations {
                load: LoadOp::Clear(1.0),
                store: StoreOp::Store,
            }),
            stencil_ops: Some(Operations {
                load: LoadOp::Clear(0),
                store: StoreOp::Store,
            }),
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    let Some(instance_buffer) = args.instance_buffer else {
        return;
    };

    rpass.set_bind_group(0, args.frame_bg, &[]);
    rpass.set_vertex_buffer(1, instance_buffer.slice(..));

    if args.params.flags.contains(RenderFlags::DRAW_SCENE_GEOMETRY) {
        profiling::scope!("scene geometry");

        let runs = scene_runs(args.instances, args.params.instanced());
        let gouraud = args.storage.shaders.gouraud();
        for run in &runs {
            let mesh = args.storage.meshes.lookup(run.mesh);
            // Geometry without texture coordinates is never textured.
            let texture = if mesh.kind.has_texcoord() {
                args.storage.textures.bindable(run.texture)
            } else {
                args.storage.textures.placeholder()
            };
            rpass.set_pipeline(gouraud.pipeline(GouraudKey {
                vertex: mesh.kind,
                samples: args.samples,
                wireframe: args.wireframe,
            }));
            rpass.set_bind_group(1, &texture.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            rpass.draw(0..mesh.vertex_count, run.instances.clone());
        }
        stats.scene_draw_calls = runs.len() as u32;
    }

    if args.params.flags.contains(RenderFlags::SHOW_MESH_NORMALS) {
        profiling::scope!("mesh normals");

        rpass.set_pipeline(args.storage.shaders.normals().pipeline(args.samples));
        for (idx, instance) in args.instances.iter().enumerate() {
            let idx = idx as u32;
            let mesh = args.storage.meshes.lookup(instance.mesh);
            rpass.set_vertex_buffer(0, mesh.normals_buffer.slice(..));
            rpass.draw(0..mesh.normals_vertex_count(), idx..idx + 1);
        }
        stats.normals_draw_calls = args.instances.len() as u32;
    }
}
