use glam::UVec2;
use wgpu::{
    Device, Extent3d, Texture, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};

use crate::{
    readback::HitTestReadback,
    types::{Passthrough, SampleCount},
    util::error_scope::GpuErrorCheck,
};

/// Format of the shaded scene output and its resolve target.
pub const SCENE_COLOR_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;
/// Format of the passthrough output. Must store each byte exactly.
pub const PASSTHROUGH_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24PlusStencil8;

pub(crate) struct TargetTexture {
    pub texture: Texture,
    pub view: TextureView,
}

impl TargetTexture {
    fn new(
        device: &Device,
        label: &str,
        size: UVec2,
        samples: SampleCount,
        format: TextureFormat,
        usage: TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: samples.get(),
            dimension: TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Every attachment of one render target allocation.
pub(crate) struct RenderTextures {
    /// Multisampled attachments written by the scene pass.
    pub scene: TargetTexture,
    pub passthrough: TargetTexture,
    pub depth: TargetTexture,
    /// Single-sampled copy of the passthrough output around the hit test
    /// pixel, never averaged across samples.
    pub skip_msaa: TargetTexture,
    /// Resolved scene color. Rims and debug quads are drawn onto it.
    pub resolved_scene: TargetTexture,
    pub resolved_passthrough: TargetTexture,
}

impl RenderTextures {
    fn new(device: &Device, size: UVec2, samples: SampleCount) -> Self {
        // Without multisampling the resolve is a texture copy.
        let resolve_source = if samples.needs_resolve() {
            TextureUsages::empty()
        } else {
            TextureUsages::COPY_SRC
        };
        let resolved = TextureUsages::RENDER_ATTACHMENT
            | TextureUsages::TEXTURE_BINDING
            | TextureUsages::COPY_DST
            | TextureUsages::COPY_SRC;

        Self {
            scene: TargetTexture::new(
                device,
                "scene color",
                size,
                samples,
                SCENE_COLOR_FORMAT,
                TextureUsages::RENDER_ATTACHMENT | resolve_source,
            ),
            passthrough: TargetTexture::new(
                device,
                "scene passthrough",
                size,
                samples,
                PASSTHROUGH_FORMAT,
                TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING | resolve_source,
            ),
            depth: TargetTexture::new(
                device,
                "scene depth",
                size,
                samples,
                DEPTH_FORMAT,
                TextureUsages::RENDER_ATTACHMENT,
            ),
            skip_msaa: TargetTexture::new(
                device,
                "skip msaa passthrough",
                size,
                SampleCount::One,
                PASSTHROUGH_FORMAT,
                TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            ),
            resolved_scene: TargetTexture::new(
                device,
                "resolved scene color",
                size,
                SampleCount::One,
                SCENE_COLOR_FORMAT,
                resolved,
            ),
            resolved_passthrough: TargetTexture::new(
                device,
                "resolved passthrough",
                size,
                SampleCount::One,
                PASSTHROUGH_FORMAT,
                resolved,
            ),
        }
    }
}

/// Offscreen attachments for one view, plus the hit test readback buffers.
///
/// Reconfiguring with the current size and sample count does nothing, so it
/// is safe to call every frame.
pub struct RenderTarget {
    size: UVec2,
    samples: SampleCount,
    generation: u64,
    pub(crate) textures: RenderTextures,
    pub(crate) hit_test: HitTestReadback,
    pub(crate) last_hit_test: Passthrough,
}

fn allocate(device: &Device, size: UVec2, samples: SampleCount) -> (RenderTextures, HitTestReadback) {
    profiling::scope!("RenderTarget allocation");

    assert!(
        size.x > 0 && size.y > 0,
        "render target must have a non-zero size, got {size}"
    );
    let max = device.limits().max_texture_dimension_2d;
    assert!(
        size.x <= max && size.y <= max,
        "render target of {size} exceeds the device texture limit of {max}"
    );

    let check = GpuErrorCheck::always(device, "render target incomplete");
    let textures = RenderTextures::new(device, size, samples);
    let hit_test = HitTestReadback::new(device);
    check.end();

    log::debug!("Allocated {size} render target with {} samples", samples.get());

    (textures, hit_test)
}

impl RenderTarget {
    /// # Panics
    ///
    /// Panics if `size` has a zero dimension or the allocation fails.
    pub fn new(device: &Device, size: UVec2, samples: SampleCount) -> Self {
        profiling::scope!("RenderTarget::new");

        let (textures, hit_test) = allocate(device, size, samples);
        Self {
            size,
            samples,
            generation: 0,
            textures,
            hit_test,
            last_hit_test: Passthrough::NONE,
        }
    }

    /// Reallocates everything if `size` or `samples` changed.
    ///
    /// Returns whether a reallocation happened. Reallocating drops any pending
    /// delayed hit test.
    pub fn reconfigure(&mut self, device: &Device, size: UVec2, samples: SampleCount) -> bool {
        profiling::scope!("RenderTarget::reconfigure");

        if size == self.size && samples == self.samples {
            return false;
        }

        let (textures, hit_test) = allocate(device, size, samples);
        self.textures = textures;
        self.hit_test = hit_test;
        self.size = size;
        self.samples = samples;
        self.generation += 1;
        self.last_hit_test = Passthrough::NONE;

        true
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn samples(&self) -> SampleCount {
        self.samples
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.x as f32 / self.size.y as f32
    }

    /// Counts reallocations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The resolved scene color, including rims and debug quads.
    pub fn scene_texture(&self) -> &Texture {
        &self.textures.resolved_scene.texture
    }

    pub fn scene_view(&self) -> &TextureView {
        &self.textures.resolved_scene.view
    }

    /// The resolved passthrough output: `(b0, b1, rim_alpha, 255)` where
    /// geometry was drawn, zero elsewhere.
    pub fn passthrough_texture(&self) -> &Texture {
        &self.textures.resolved_passthrough.texture
    }

    /// Result the last frame reported.
    pub fn last_hit_test(&self) -> Passthrough {
        self.last_hit_test
    }
}
