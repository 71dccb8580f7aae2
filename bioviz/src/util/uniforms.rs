use encase::{internal::WriteInto, ShaderType, UniformBuffer};
use wgpu::{Buffer, BufferDescriptor, BufferUsages, Device, Queue};

/// Serializes `value` with WGSL uniform layout rules.
pub fn uniform_bytes<T: ShaderType + WriteInto>(value: &T) -> Vec<u8> {
    let mut buffer = UniformBuffer::new(Vec::with_capacity(T::min_size().get() as usize));
    buffer
        .write(value)
        .expect("uniform data does not fit its own layout");
    buffer.into_inner()
}

/// Creates a uniform buffer sized for `T`, initially zeroed.
pub fn create_uniform_buffer<T: ShaderType>(device: &Device, label: &str) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some(label),
        size: T::min_size().get(),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub fn write_uniform<T: ShaderType + WriteInto>(queue: &Queue, buffer: &Buffer, value: &T) {
    queue.write_buffer(buffer, 0, &uniform_bytes(value));
}
