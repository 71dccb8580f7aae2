use glam::UVec2;
use wgpu::{
    BindGroup, BindGroupLayout, Device, Extent3d, ImageCopyTexture, ImageDataLayout, Origin3d, Queue, Sampler,
    SamplerBindingType, Texture, TextureAspect, TextureDescriptor, TextureDimension, TextureSampleType,
    TextureUsages, TextureView, TextureViewDescriptor,
};

use crate::{
    samplers::create_sampler,
    types::{self, TextureFilter, TextureHandle, TextureWrap},
    util::bind_merge::{BindGroupBuilder, BindGroupLayoutBuilder},
};

/// A texture uploaded into a [`TextureStore`], ready to be bound as group 1
/// of the scene pass.
pub struct GpuTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub sampler: Sampler,
    pub bind_group: BindGroup,
    pub size: UVec2,
}

/// Owns every uploaded texture. Handles are indices into the store.
pub struct TextureStore {
    bgl: BindGroupLayout,
    placeholder: GpuTexture,
    textures: Vec<GpuTexture>,
}

impl TextureStore {
    pub fn new(device: &Device, queue: &Queue) -> Self {
        profiling::scope!("TextureStore::new");

        let bgl = BindGroupLayoutBuilder::new()
            .append_texture(TextureSampleType::Float { filterable: true }, false)
            .append_sampler(SamplerBindingType::Filtering)
            .build(device, Some("material texture bgl"));

        let white = types::Texture::from_rgba8(UVec2::ONE, vec![0xff; 4])
            .expect("1x1 placeholder texture is well formed")
            .with_label("white placeholder")
            .with_filter(TextureFilter::Nearest)
            .with_wrap(TextureWrap::ClampToEdge);
        let placeholder = upload(device, queue, &bgl, &white);

        Self {
            bgl,
            placeholder,
            textures: Vec::new(),
        }
    }

    /// Uploads `texture` once and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the store is full.
    pub fn allocate(&mut self, device: &Device, queue: &Queue, texture: &types::Texture) -> TextureHandle {
        profiling::scope!("TextureStore::allocate");

        let handle = TextureHandle::from_index(self.textures.len());
        self.textures.push(upload(device, queue, &self.bgl, texture));

        log::debug!(
            "Allocated texture {:?} {:?} of size {}",
            handle,
            texture.label.as_deref().unwrap_or("<unlabeled>"),
            texture.size()
        );

        handle
    }

    /// # Panics
    ///
    /// Panics if `handle` is invalid or does not belong to this store.
    pub fn lookup(&self, handle: TextureHandle) -> &GpuTexture {
        let index = handle.index().expect("looked up an invalid texture handle");
        &self.textures[index]
    }

    /// # Panics
    ///
    /// Panics if `handle` is invalid or does not belong to this store.
    pub fn lookup_mut(&mut self, handle: TextureHandle) -> &mut GpuTexture {
        let index = handle.index().expect("looked up an invalid texture handle");
        &mut self.textures[index]
    }

    /// The texture bound for `handle`: the stored texture when valid,
    /// otherwise the white placeholder.
    pub fn bindable(&self, handle: TextureHandle) -> &GpuTexture {
        match handle.index() {
            Some(_) => self.lookup(handle),
            None => &self.placeholder,
        }
    }

    pub fn placeholder(&self) -> &GpuTexture {
        &self.placeholder
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bgl
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn upload(device: &Device, queue: &Queue, bgl: &BindGroupLayout, texture: &types::Texture) -> GpuTexture {
    let size = texture.size();
    let extent = Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    };

    let gpu_texture = device.create_texture(&TextureDescriptor {
        label: texture.label.as_deref(),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: texture.format(),
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        ImageCopyTexture {
            texture: &gpu_texture,
            mip_level: 0,
            origin: Origin3d::ZERO,
            aspect: TextureAspect::All,
        },
        texture.data(),
        ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(size.x * 4),
            rows_per_image: None,
        },
        extent,
    );

    let view = gpu_texture.create_view(&TextureViewDescriptor::default());
    let sampler = create_sampler(
        device,
        texture.label.as_deref().unwrap_or("texture sampler"),
        texture.filter.into(),
        texture.wrap.into(),
    );
    let bind_group = BindGroupBuilder::new()
        .append_texture_view(&view)
        .append_sampler(&sampler)
        .build(device, texture.label.as_deref(), bgl);

    GpuTexture {
        texture: gpu_texture,
        view,
        sampler,
        bind_group,
        size,
    }
}
