use std::sync::Arc;

use glam::UVec2;
use wgpu::{
    util::DeviceExt, Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Device, Queue,
    TextureFormat, TextureView,
};

use crate::{
    programs::{ColormappedUniforms, EdgeDetectionUniforms, FrameUniforms, PlainTextureUniforms},
    render_target::RenderTarget,
    samplers::Samplers,
    storage::GpuStorage,
    types::{mesh_gen, DrawInstance, Drawlist, Passthrough, RenderFlags, RenderParams},
    util::{
        bind_merge::BindGroupBuilder,
        error_scope::GpuErrorCheck,
        uniforms::{create_uniform_buffer, write_uniform},
    },
    InstanceAdapterDevice,
};

mod hit_test;
mod overlays;
mod present;
mod resolve;
mod scene;

pub use hit_test::hit_test_region;

/// Counters of the last frame drawn.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued by the scene pass: one per run in instanced mode,
    /// one per instance otherwise.
    pub scene_draw_calls: u32,
    /// Instances uploaded for the frame.
    pub instances: u32,
    pub normals_draw_calls: u32,
    /// Rim and debug quad draws.
    pub overlay_draw_calls: u32,
}

/// Per-frame instance data. Grows to the next power of two and never
/// shrinks.
struct InstanceBuffer {
    buffer: Option<Buffer>,
    capacity: usize,
}

impl InstanceBuffer {
    fn new() -> Self {
        Self {
            buffer: None,
            capacity: 0,
        }
    }

    fn upload(&mut self, device: &Device, queue: &Queue, instances: &[DrawInstance]) -> Option<&Buffer> {
        profiling::scope!("InstanceBuffer::upload");

        if instances.is_empty() {
            return None;
        }

        if self.buffer.is_none() || self.capacity < instances.len() {
            let capacity = instances.len().next_power_of_two();
            log::debug!("Growing instance buffer from {} to {} instances", self.capacity, capacity);
            self.buffer = Some(device.create_buffer(&BufferDescriptor {
                label: Some("draw instances"),
                size: (capacity * std::mem::size_of::<DrawInstance>()) as u64,
                usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }

        let buffer = self.buffer.as_ref()?;
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
        Some(buffer)
    }
}

/// Per-frame uniform buffers. Each is written at most once per submission.
struct UniformBuffers {
    frame: Buffer,
    rims: Buffer,
    debug_quads: [Buffer; 2],
    present: Buffer,
}

/// Draws frames into a [`RenderTarget`] and reports what is under the hit
/// test cursor.
pub struct Renderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    samplers: Samplers,
    quad: Buffer,
    instances: InstanceBuffer,
    uniforms: UniformBuffers,
    stats: FrameStats,
    warned_wireframe: bool,
}

impl Renderer {
    pub fn new(iad: &InstanceAdapterDevice) -> Self {
        profiling::scope!("Renderer::new");

        let device = Arc::clone(&iad.device);
        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay quad"),
            contents: bytemuck::cast_slice(&mesh_gen::textured_quad()),
            usage: BufferUsages::VERTEX,
        });
        let uniforms = UniformBuffers {
            frame: create_uniform_buffer::<FrameUniforms>(&device, "frame uniforms"),
            rims: create_uniform_buffer::<EdgeDetectionUniforms>(&device, "rim uniforms"),
            debug_quads: [
                create_uniform_buffer::<ColormappedUniforms>(&device, "debug quad rgb uniforms"),
                create_uniform_buffer::<ColormappedUniforms>(&device, "debug quad alpha uniforms"),
            ],
            present: create_uniform_buffer::<PlainTextureUniforms>(&device, "present uniforms"),
        };

        Self {
            samplers: Samplers::new(&device),
            queue: Arc::clone(&iad.queue),
            device,
            quad,
            instances: InstanceBuffer::new(),
            uniforms,
            stats: FrameStats::default(),
            warned_wireframe: false,
        }
    }

    fn wireframe(&mut self, storage: &GpuStorage, params: &RenderParams) -> bool {
        if !params.flags.contains(RenderFlags::WIREFRAME_MODE) {
            return false;
        }
        if storage.shaders.gouraud().supports_wireframe() {
            return true;
        }
        if !self.warned_wireframe {
            log::warn!("Wireframe mode requested but the device lacks line polygon support; ignoring");
            self.warned_wireframe = true;
        }
        false
    }

    /// Draws one frame and returns the passthrough under the hit test pixel.
    ///
    /// With the delayed hit test the result describes the previous frame, and
    /// is [`Passthrough::NONE`] when the previous frame did not request one.
    /// The drawlist is drawn in the order given; call
    /// [`Drawlist::optimize`] first for good batching.
    pub fn draw(
        &mut self,
        storage: &GpuStorage,
        params: &RenderParams,
        drawlist: &Drawlist,
        target: &mut RenderTarget,
    ) -> Passthrough {
        profiling::scope!("Renderer::draw");

        let wireframe = self.wireframe(storage, params);
        let device = &*self.device;
        let mut stats = FrameStats::default();
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("bioviz frame"),
        });

        let check = GpuErrorCheck::debug_only(device, "setup");
        write_uniform(&self.queue, &self.uniforms.frame, &FrameUniforms::new(params));
        let instance_buffer = self.instances.upload(device, &self.queue, drawlist.instances());
        stats.instances = drawlist.len() as u32;
        let frame_bg = BindGroupBuilder::new().append_buffer(&self.uniforms.frame).build(
            device,
            Some("frame uniforms"),
            storage.shaders.frame_bind_group_layout(),
        );
        check.end();

        let check = GpuErrorCheck::debug_only(device, "scene");
        scene::draw_scene(
            scene::SceneArgs {
                storage,
                encoder: &mut encoder,
                target: &target.textures,
                samples: target.samples(),
                frame_bg: &frame_bg,
                instance_buffer,
                instances: drawlist.instances(),
                params,
                wireframe,
            },
            &mut stats,
        );
        check.end();

        let check = GpuErrorCheck::debug_only(device, "hit test");
        let request = match params.hittest_pixel(target.size()) {
            Some(pixel) => {
                let delayed = params
                    .flags
                    .contains(RenderFlags::USE_OPTIMIZED_BUT_DELAYED_1_FRAME_HIT_TEST);
                let request = target.hit_test.begin(delayed);
                hit_test::blit_and_copy(hit_test::HitTestArgs {
                    device,
                    storage,
                    encoder: &mut encoder,
                    target: &target.textures,
                    samples: target.samples(),
                    size: target.size(),
                    quad: &self.quad,
                    pixel,
                    destination: target.hit_test.destination(request),
                });
                Some(request)
            }
            None => {
                target.hit_test.skip();
                None
            }
        };
        check.end();

        let check = GpuErrorCheck::debug_only(device, "resolve");
        resolve::resolve(&mut encoder, &target.textures, target.samples(), target.size());
        check.end();

        let overlay_args = || overlays::OverlayArgs {
            device,
            queue: &self.queue,
            storage,
            target: &target.textures,
            size: target.size(),
            samplers: &self.samplers,
            quad: &self.quad,
        };

        if params.flags.contains(RenderFlags::DRAW_RIMS) {
            let check = GpuErrorCheck::debug_only(device, "rims");
            overlays::draw_rims(overlay_args(), &mut encoder, &self.uniforms.rims, params, &mut stats);
            check.end();
        }

        if params.flags.contains(RenderFlags::DRAW_DEBUG_QUADS) {
            let check = GpuErrorCheck::debug_only(device, "debug quads");
            overlays::draw_debug_quads(overlay_args(), &mut encoder, &self.uniforms.debug_quads, &mut stats);
            check.end();
        }

        let submission = self.queue.submit(Some(encoder.finish()));

        let result = match request {
            Some(request) => target.hit_test.finish(device, request, submission),
            None => Passthrough::NONE,
        };
        log::trace!("Hit test at {} reported {:?}", params.hittest, result);

        target.last_hit_test = result;
        self.stats = stats;

        result
    }

    /// Copies the resolved scene of `target` onto `output`, stretching it to
    /// fill.
    ///
    /// # Panics
    ///
    /// Panics if `format` is not one of [`crate::programs::PRESENT_FORMATS`].
    pub fn present(&mut self, storage: &GpuStorage, target: &RenderTarget, output: &TextureView, format: TextureFormat) {
        profiling::scope!("Renderer::present");

        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("bioviz present"),
        });
        let check = GpuErrorCheck::debug_only(&self.device, "present");
        present::present(present::PresentArgs {
            device: &self.device,
            queue: &self.queue,
            storage,
            encoder: &mut encoder,
            source: target.scene_view(),
            output,
            format,
            samplers: &self.samplers,
            quad: &self.quad,
            uniforms: &self.uniforms.present,
        });
        check.end();
        self.queue.submit(Some(encoder.finish()));
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }
}

pub(crate) fn full_extent(size: UVec2) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    }
}
