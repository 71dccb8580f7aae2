use wgpu::{
    Buffer, Color, CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureFormat, TextureView,
};

use crate::{
    programs::PlainTextureUniforms,
    samplers::Samplers,
    storage::GpuStorage,
    util::{bind_merge::BindGroupBuilder, uniforms::write_uniform},
};

pub(super) struct PresentArgs<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub storage: &'a GpuStorage,
    pub encoder: &'a mut CommandEncoder,
    pub source: &'a TextureView,
    pub output: &'a TextureView,
    pub format: TextureFormat,
    pub samplers: &'a Samplers,
    pub quad: &'a Buffer,
    pub uniforms: &'a Buffer,
}

pub(super) fn present(args: PresentArgs<'_>) {
    profiling::scope!("present");

    let shader = args.storage.shaders.plain_texture();
    let pipeline = shader
        .pipeline(args.format)
        .unwrap_or_else(|| panic!("cannot present to {:?}", args.format));

    write_uniform(args.queue, args.uniforms, &PlainTextureUniforms::default());
    let bind_group = BindGroupBuilder::new()
        .append_texture_view(args.source)
        .append_sampler(&args.samplers.linear)
        .append_buffer(args.uniforms)
        .build(args.device, Some("present"), shader.bind_group_layout());

    let mut rpass = args.encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some("present"),
        color_attachments: &[Some(RenderPassColorAttachment {
            view: args.output,
            resolve_target: None,
            ops: Operations {
                load: LoadOp::Clear(Color::BLACK),
                store: StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    rpass.set_pipeline(pipeline);
    rpass.set_bind_group(0, &bind_group, &[]);
    rpass.set_vertex_buffer(0, args.quad.slice(..));
    rpass.draw(0..6, 0..1);
}
