use glam::UVec2;
use wgpu::{CommandEncoder, LoadOp, Operations, RenderPassColorAttachment, RenderPassDescriptor, StoreOp};

use crate::{
    render_target::{RenderTextures, TargetTexture},
    renderer::full_extent,
    types::SampleCount,
};

/// Resolves both scene outputs into their single-sampled textures, one
/// pass per output.
pub(super) fn resolve(encoder: &mut CommandEncoder, target: &RenderTextures, samples: SampleCount, size: UVec2) {
    profiling::scope!("resolve");

    let pairs: [(&TargetTexture, &TargetTexture, &str); 2] = [
        (&target.scene, &target.resolved_scene, "resolve scene color"),
        (&target.passthrough, &target.resolved_passthrough, "resolve passthrough"),
    ];

    for (source, destination, label) in pairs {
        if samples.needs_resolve() {
            encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &source.view,
                    resolve_target: Some(&destination.view),
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        } else {
            encoder.copy_texture_to_texture(
                source.texture.as_image_copy(),
                destination.texture.as_image_copy(),
                full_extent(size),
            );
        }
    }
}
