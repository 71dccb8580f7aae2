use glam::UVec2;
use wgpu::{
    Buffer, Color, CommandEncoder, Device, ImageCopyBuffer, ImageDataLayout, LoadOp, Operations,
    RenderPassColorAttachment, RenderPassDescriptor, StoreOp,
};

use crate::{
    render_target::RenderTextures,
    storage::GpuStorage,
    types::SampleCount,
    util::bind_merge::BindGroupBuilder,
};

/// Side length of the region copied around the hit test pixel.
const HIT_TEST_REGION_SIZE: u32 = 3;

/// The region around `pixel` that the bypass blit covers, as
/// `(origin, extent)`, clamped to a target of `size`.
///
/// `pixel` must lie inside the target.
pub fn hit_test_region(pixel: UVec2, size: UVec2) -> (UVec2, UVec2) {
    let half = HIT_TEST_REGION_SIZE / 2;
    let origin = UVec2::new(pixel.x.saturating_sub(half), pixel.y.saturating_sub(half));
    let end = (pixel + UVec2::splat(half + 1)).min(size);
    (origin, end - origin)
}

pub(super) struct HitTestArgs<'a> {
    pub device: &'a Device,
    pub storage: &'a GpuStorage,
    pub encoder: &'a mut CommandEncoder,
    pub target: &'a RenderTextures,
    pub samples: SampleCount,
    pub size: UVec2,
    pub quad: &'a Buffer,
    pub pixel: UVec2,
    pub destination: &'a Buffer,
}

/// Copies sample zero of the passthrough output around the cursor into the
/// single-sampled bypass texture, then copies the cursor pixel into
/// `destination`.
pub(super) fn blit_and_copy(args: HitTestArgs<'_>) {
    profiling::scope!("hit test");

    let blitter = args.storage.shaders.skip_msaa_blitter();
    let bind_group = BindGroupBuilder::new()
        .append_texture_view(&args.target.passthrough.view)
        .build(args.device, Some("skip msaa blit"), blitter.bind_group_layout(args.samples));

    let (origin, extent) = hit_test_region(args.pixel, args.size);

    {
        let mut rpass = args.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("skip msaa blit"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &args.target.skip_msaa.view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color::TRANSPARENT),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_viewport(
            origin.x as f32,
            origin.y as f32,
            extent.x as f32,
            extent.y as f32,
            0.0,
            1.0,
        );
        rpass.set_scissor_rect(origin.x, origin.y, extent.x, extent.y);
        rpass.set_pipeline(blitter.pipeline(args.samples));
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, args.quad.slice(..));
        rpass.draw(0..6, 0..1);
    }

    let mut source = args.target.skip_msaa.texture.as_image_copy();
    source.origin = wgpu::Origin3d {
        x: args.pixel.x,
        y: args.pixel.y,
        z: 0,
    };
    args.encoder.copy_texture_to_buffer(
        source,
        ImageCopyBuffer {
            buffer: args.destination,
            layout: ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_centered_on_the_pixel() {
        let size = UVec2::new(64, 64);
        assert_eq!(
            hit_test_region(UVec2::new(10, 20), size),
            (UVec2::new(9, 19), UVec2::new(3, 3))
        );
    }

    #[test]
    fn region_is_clamped_at_the_edges() {
        let size = UVec2::new(64, 32);
        assert_eq!(hit_test_region(UVec2::ZERO, size), (UVec2::ZERO, UVec2::new(2, 2)));
        assert_eq!(
            hit_test_region(UVec2::new(63, 31), size),
            (UVec2::new(62, 30), UVec2::new(2, 2))
        );
    }

    #[test]
    fn region_always_contains_the_pixel() {
        let size = UVec2::new(5, 4);
        for x in 0..size.x {
            for y in 0..size.y {
                let pixel = UVec2::new(x, y);
                let (origin, extent) = hit_test_region(pixel, size);
                assert!(pixel.cmpge(origin).all());
                assert!(pixel.cmplt(origin + extent).all());
                assert!((origin + extent).cmple(size).all());
            }
        }
    }
}
