use std::num::{NonZeroU32, NonZeroU64};

use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, Buffer, BufferBindingType, Device, Sampler, SamplerBindingType, ShaderStages,
    TextureSampleType, TextureView, TextureViewDimension,
};

/// Builds a bind group layout with bindings numbered in append order.
#[derive(Debug, Clone, Default)]
pub struct BindGroupLayoutBuilder {
    bgl_entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, visibility: ShaderStages, ty: BindingType, count: Option<NonZeroU32>) -> &mut Self {
        let binding = self.bgl_entries.len() as u32;
        self.bgl_entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty,
            count,
        });
        self
    }

    pub fn append_uniform(&mut self, visibility: ShaderStages, min_binding_size: NonZeroU64) -> &mut Self {
        self.append(
            visibility,
            BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(min_binding_size),
            },
            None,
        )
    }

    pub fn append_texture(&mut self, sample_type: TextureSampleType, multisampled: bool) -> &mut Self {
        self.append(
            ShaderStages::FRAGMENT,
            BindingType::Texture {
                sample_type,
                view_dimension: TextureViewDimension::D2,
                multisampled,
            },
            None,
        )
    }

    pub fn append_sampler(&mut self, ty: SamplerBindingType) -> &mut Self {
        self.append(ShaderStages::FRAGMENT, BindingType::Sampler(ty), None)
    }

    pub fn build(&self, device: &Device, label: Option<&str>) -> BindGroupLayout {
        device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label,
            entries: &self.bgl_entries,
        })
    }
}

/// Builds a bind group whose bindings are numbered in append order, matching
/// a layout made by [`BindGroupLayoutBuilder`].
pub struct BindGroupBuilder<'a> {
    bg_entries: Vec<BindGroupEntry<'a>>,
}

impl<'a> Default for BindGroupBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new() -> Self {
        Self {
            bg_entries: Vec::with_capacity(4),
        }
    }

    pub fn append(&mut self, resource: BindingResource<'a>) -> &mut Self {
        let binding = self.bg_entries.len() as u32;
        self.bg_entries.push(BindGroupEntry { binding, resource });
        self
    }

    pub fn append_buffer(&mut self, buffer: &'a Buffer) -> &mut Self {
        self.append(buffer.as_entire_binding())
    }

    pub fn append_texture_view(&mut self, view: &'a TextureView) -> &mut Self {
        self.append(BindingResource::TextureView(view))
    }

    pub fn append_sampler(&mut self, sampler: &'a Sampler) -> &mut Self {
        self.append(BindingResource::Sampler(sampler))
    }

    pub fn build(&self, device: &Device, label: Option<&str>, bgl: &BindGroupLayout) -> BindGroup {
        device.create_bind_group(&BindGroupDescriptor {
            label,
            layout: bgl,
            entries: &self.bg_entries,
        })
    }
}
