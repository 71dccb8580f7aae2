use thiserror::Error;
use wgpu::RequestDeviceError;

/// Enum mapping to each device limit the renderer checks.
#[derive(Debug)]
pub enum LimitType {
    BindGroups,
    MaxVertexBuffers,
    MaxVertexAttributes,
    MaxVertexBufferArrayStride,
    MaxTextureDimension2d,
    MaxInterStageShaderComponents,
}

/// Reason why the renderer failed to initialize.
#[derive(Error, Debug)]
pub enum RendererInitializationError {
    #[error("No supported adapter found")]
    MissingAdapter,
    #[error("The device limit of {:?} is {} but renderer requires at least {}", ty, device_limit, required_limit)]
    LowDeviceLimit {
        ty: LimitType,
        device_limit: u64,
        required_limit: u64,
    },
    #[error("Requesting a device failed")]
    RequestDeviceFailed(#[source] RequestDeviceError),
}
