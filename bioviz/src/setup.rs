use std::sync::Arc;

use wgpu::{
    Adapter, AdapterInfo, Backend, Backends, Device, DeviceDescriptor, DeviceType, Features, Instance,
    InstanceDescriptor, Limits, Queue,
};

use crate::{LimitType, RendererInitializationError};

/// Features the renderer uses if they are available, but does not require.
///
/// Without `POLYGON_MODE_LINE` the wireframe flag is ignored.
pub const OPTIONAL_FEATURES: Features = Features::POLYGON_MODE_LINE;

/// Limits required to run the renderer.
pub fn required_limits() -> Limits {
    Limits {
        max_bind_groups: 2,
        max_vertex_buffers: 2,
        max_vertex_attributes: 12,
        max_vertex_buffer_array_stride: 96,
        max_texture_dimension_2d: 2048,
        max_inter_stage_shader_components: 16,
        ..Limits::downlevel_webgl2_defaults()
    }
}

fn check_limit(device: u32, required: u32, ty: LimitType) -> Result<u32, RendererInitializationError> {
    if device < required {
        Err(RendererInitializationError::LowDeviceLimit {
            ty,
            device_limit: device as u64,
            required_limit: required as u64,
        })
    } else {
        Ok(device)
    }
}

/// Check that all limits the renderer depends on are met, returning the
/// limits to request the device with.
pub fn check_limits(device_limits: &Limits) -> Result<Limits, RendererInitializationError> {
    let required = required_limits();
    check_limit(
        device_limits.max_bind_groups,
        required.max_bind_groups,
        LimitType::BindGroups,
    )?;
    check_limit(
        device_limits.max_vertex_buffers,
        required.max_vertex_buffers,
        LimitType::MaxVertexBuffers,
    )?;
    check_limit(
        device_limits.max_vertex_attributes,
        required.max_vertex_attributes,
        LimitType::MaxVertexAttributes,
    )?;
    check_limit(
        device_limits.max_vertex_buffer_array_stride,
        required.max_vertex_buffer_array_stride,
        LimitType::MaxVertexBufferArrayStride,
    )?;
    check_limit(
        device_limits.max_texture_dimension_2d,
        required.max_texture_dimension_2d,
        LimitType::MaxTextureDimension2d,
    )?;
    check_limit(
        device_limits.max_inter_stage_shader_components,
        required.max_inter_stage_shader_components,
        LimitType::MaxInterStageShaderComponents,
    )?;
    Ok(device_limits.clone())
}

/// Container for Instance/Adapter/Device/Queue etc.
///
/// Create these yourself, or call [`create_iad`].
#[derive(Clone)]
pub struct InstanceAdapterDevice {
    pub instance: Arc<Instance>,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub info: AdapterInfo,
}

fn device_type_rank(ty: DeviceType) -> u8 {
    match ty {
        DeviceType::DiscreteGpu => 0,
        DeviceType::IntegratedGpu => 1,
        DeviceType::VirtualGpu => 2,
        DeviceType::Cpu => 3,
        DeviceType::Other => 4,
    }
}

/// Creates an Instance/Adapter/Device/Queue using the given choices. Tries to
/// get the best combination.
///
/// `desired_device` is matched case-insensitively against a substring of the
/// adapter name.
pub async fn create_iad(
    desired_backend: Option<Backend>,
    desired_device: Option<String>,
) -> Result<InstanceAdapterDevice, RendererInitializationError> {
    profiling::scope!("create_iad");

    let default_backend_order = [Backend::Vulkan, Backend::Metal, Backend::Dx12, Backend::Gl];
    let backend_bits = desired_backend.map_or(Backends::all(), Backends::from);
    let desired_device = desired_device.map(|d| d.to_lowercase());

    let instance = Instance::new(InstanceDescriptor {
        backends: backend_bits,
        ..Default::default()
    });

    let mut candidates = Vec::new();
    for backend in default_backend_order {
        if !backend_bits.contains(Backends::from(backend)) {
            log::debug!("Skipping unwanted backend {:?}", backend);
            continue;
        }
        for (idx, adapter) in instance.enumerate_adapters(Backends::from(backend)).into_iter().enumerate() {
            let info = adapter.get_info();
            log::debug!("{:?} Adapter {}: {:#?}", backend, idx, info);

            if let Some(ref desired) = desired_device {
                if !info.name.to_lowercase().contains(desired) {
                    log::debug!("Adapter not the desired device");
                    continue;
                }
            }
            match check_limits(&adapter.limits()) {
                Ok(limits) => candidates.push((adapter, info, limits)),
                Err(e) => log::debug!("Adapter not usable: {}", e),
            }
        }
    }

    // Stable sort keeps the backend preference order within a device type.
    candidates.sort_by_key(|(_, info, _)| device_type_rank(info.device_type));

    let (adapter, info, limits) = candidates
        .into_iter()
        .next()
        .ok_or(RendererInitializationError::MissingAdapter)?;
    let features = adapter.features() & OPTIONAL_FEATURES;

    log::info!("Chosen adapter: {} ({:?} on {:?})", info.name, info.device_type, info.backend);
    log::debug!("Chosen features: {:?}", features);
    log::debug!("Chosen limits: {:#?}", limits);

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some("bioviz device"),
                required_features: features,
                required_limits: limits,
            },
            None,
        )
        .await
        .map_err(RendererInitializationError::RequestDeviceFailed)?;

    Ok(InstanceAdapterDevice {
        instance: Arc::new(instance),
        adapter: Arc::new(adapter),
        device: Arc::new(device),
        queue: Arc::new(queue),
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downlevel_limits_are_enough() {
        check_limits(&Limits::downlevel_defaults()).unwrap();
    }

    #[test]
    fn low_vertex_attribute_limit_is_rejected() {
        let limits = Limits {
            max_vertex_attributes: 8,
            ..Limits::downlevel_defaults()
        };
        assert!(matches!(
            check_limits(&limits),
            Err(RendererInitializationError::LowDeviceLimit {
                ty: LimitType::MaxVertexAttributes,
                device_limit: 8,
                required_limit: 12,
            })
        ));
    }

    #[test]
    fn discrete_preferred() {
        assert!(device_type_rank(DeviceType::DiscreteGpu) < device_type_rank(DeviceType::IntegratedGpu));
        assert!(device_type_rank(DeviceType::IntegratedGpu) < device_type_rank(DeviceType::Cpu));
    }
}
