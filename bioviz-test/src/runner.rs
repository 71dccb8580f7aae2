use anyhow::{ensure, Context, Result};
use bioviz::{
    types::{glam::UVec2, Drawlist, Passthrough, RenderParams, SampleCount},
    GpuStorage, InstanceAdapterDevice, RenderTarget, Renderer,
};
use wgpu::{BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, ImageCopyBuffer, ImageDataLayout};

/// Side length of the render targets tests draw into.
pub const TEST_SIZE: u32 = 64;

/// Owns a device, resource storage and renderer for one test.
pub struct TestRunner {
    pub iad: InstanceAdapterDevice,
    pub storage: GpuStorage,
    pub renderer: Renderer,
}

impl TestRunner {
    pub fn new(iad: InstanceAdapterDevice) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        Self {
            storage: GpuStorage::new(&iad),
            renderer: Renderer::new(&iad),
            iad,
        }
    }

    /// A square render target.
    pub fn target(&self, size: u32, samples: SampleCount) -> Result<RenderTarget> {
        ensure!(size % 64 == 0, "Size must be a multiple of 64, is {}", size);
        Ok(RenderTarget::new(&self.iad.device, UVec2::splat(size), samples))
    }

    pub fn draw(&mut self, params: &RenderParams, drawlist: &Drawlist, target: &mut RenderTarget) -> Passthrough {
        self.renderer.draw(&self.storage, params, drawlist, target)
    }

    /// Copies an RGBA8 texture back to the CPU. The width must be a multiple
    /// of 64 so rows need no padding.
    pub async fn read_texture(&self, texture: &wgpu::Texture) -> Result<image::RgbaImage> {
        let width = texture.width();
        let height = texture.height();
        ensure!(width % 64 == 0, "Width must be a multiple of 64, is {}", width);

        let buffer = self.iad.device.create_buffer(&BufferDescriptor {
            label: Some("Test output buffer"),
            size: (width * height * 4) as u64,
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.iad.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Test output encoder"),
        });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            ImageCopyBuffer {
                buffer: &buffer,
                layout: ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: None,
                },
            },
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        let submit_index = self.iad.queue.submit(Some(encoder.finish()));

        let (sender, receiver) = flume::bounded(1);
        buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.iad
            .device
            .poll(wgpu::Maintain::WaitForSubmissionIndex(submit_index));

        receiver
            .recv_async()
            .await
            .context("Failed to recieve message from map_async")?
            .context("Failed to map test output buffer")?;

        let mapping = buffer.slice(..).get_mapped_range();

        image::RgbaImage::from_raw(width, height, mapping.to_vec()).context("Failed to create image from mapping")
    }

    /// The resolved scene color of `target`.
    pub async fn read_scene(&self, target: &RenderTarget) -> Result<image::RgbaImage> {
        self.read_texture(target.scene_texture()).await
    }

    /// The resolved passthrough output of `target`.
    pub async fn read_passthrough(&self, target: &RenderTarget) -> Result<image::RgbaImage> {
        self.read_texture(target.passthrough_texture()).await
    }
}
