use wgpu::{AddressMode, Device, FilterMode, Sampler, SamplerDescriptor};

/// Container holding the samplers used by the overlay passes.
pub struct Samplers {
    /// Bilinear, clamped to the edge. Used for the debug quads and presenting.
    pub linear: Sampler,
    /// Nearest neighbor, clamped to the edge. Used for edge detection so that
    /// neighboring passthrough texels are never mixed.
    pub nearest: Sampler,
}

impl Samplers {
    /// Create a new set of samplers with this device.
    pub fn new(device: &Device) -> Self {
        profiling::scope!("Samplers::new");

        Self {
            linear: create_sampler(device, "linear clamp", FilterMode::Linear, AddressMode::ClampToEdge),
            nearest: create_sampler(device, "nearest clamp", FilterMode::Nearest, AddressMode::ClampToEdge),
        }
    }
}

pub(crate) fn create_sampler(device: &Device, label: &str, filter: FilterMode, address_mode: AddressMode) -> Sampler {
    device.create_sampler(&SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: FilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 100.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color: None,
    })
}
