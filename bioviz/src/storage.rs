use std::sync::Arc;

use wgpu::{Device, Queue};

use crate::{
    managers::{MeshStore, ShaderStore, TextureStore},
    types::{mesh_gen, Mesh, MeshHandle, Texture, TextureHandle, Vertex},
    InstanceAdapterDevice,
};

/// Every GPU resource a frame can reference: meshes, textures, and the shader
/// programs.
///
/// Drawing only needs a shared reference, so uploads happen between frames.
pub struct GpuStorage {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pub meshes: MeshStore,
    pub textures: TextureStore,
    pub shaders: ShaderStore,
    /// Chequered floor texture, uploaded when the storage is created.
    pub chequer_texture: TextureHandle,
}

impl GpuStorage {
    pub fn new(iad: &InstanceAdapterDevice) -> Self {
        profiling::scope!("GpuStorage::new");

        let device = Arc::clone(&iad.device);
        let queue = Arc::clone(&iad.queue);

        let mut textures = TextureStore::new(&device, &queue);
        let shaders = ShaderStore::new(&device, textures.bind_group_layout());
        let chequer_texture = textures.allocate(&device, &queue, &mesh_gen::chequered_floor_texture());

        Self {
            device,
            queue,
            meshes: MeshStore::new(),
            textures,
            shaders,
            chequer_texture,
        }
    }

    pub fn upload_mesh<V: Vertex>(&mut self, mesh: &Mesh<V>) -> MeshHandle {
        self.meshes.allocate(&self.device, mesh)
    }

    pub fn upload_texture(&mut self, texture: &Texture) -> TextureHandle {
        self.textures.allocate(&self.device, &self.queue, texture)
    }
}
