use bytemuck::Pod;
use wgpu::{util::DeviceExt, Buffer, BufferUsages, Device};

use crate::types::{Mesh, MeshHandle, UntexturedVertex, Vertex, VertexKind};

/// A mesh uploaded into a [`MeshStore`].
pub struct GpuMesh {
    /// The vertices as uploaded, in the layout of `kind`.
    pub vertex_buffer: Buffer,
    /// Every vertex twice, as untextured vertices, for drawing normals as a
    /// line list.
    pub normals_buffer: Buffer,
    pub vertex_count: u32,
    pub kind: VertexKind,
}

impl GpuMesh {
    pub fn normals_vertex_count(&self) -> u32 {
        self.vertex_count * 2
    }
}

/// Owns every uploaded mesh. Handles are indices into the store.
#[derive(Default)]
pub struct MeshStore {
    meshes: Vec<GpuMesh>,
}

fn normal_lines<V: Vertex>(vertices: &[V]) -> Vec<UntexturedVertex> {
    vertices
        .iter()
        .flat_map(|v| {
            let vertex = UntexturedVertex::new(v.position(), v.normal());
            [vertex, vertex]
        })
        .collect()
}

fn create_vertex_buffer<T: Pod>(device: &Device, label: &str, data: &[T]) -> Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: BufferUsages::VERTEX,
    })
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `mesh` once and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the store is full.
    pub fn allocate<V: Vertex>(&mut self, device: &Device, mesh: &Mesh<V>) -> MeshHandle {
        profiling::scope!("MeshStore::allocate");

        let handle = MeshHandle::from_index(self.meshes.len());
        let vertices = mesh.vertices();

        self.meshes.push(GpuMesh {
            vertex_buffer: create_vertex_buffer(device, "mesh vertices", vertices),
            normals_buffer: create_vertex_buffer(device, "mesh normal lines", &normal_lines(vertices)),
            vertex_count: mesh.vertex_count(),
            kind: V::KIND,
        });

        log::debug!(
            "Allocated {:?} mesh {:?} with {} vertices",
            V::KIND,
            handle,
            mesh.vertex_count()
        );

        handle
    }

    /// # Panics
    ///
    /// Panics if `handle` is invalid or does not belong to this store.
    pub fn lookup(&self, handle: MeshHandle) -> &GpuMesh {
        let index = handle.index().expect("looked up an invalid mesh handle");
        &self.meshes[index]
    }

    /// # Panics
    ///
    /// Panics if `handle` is invalid or does not belong to this store.
    pub fn lookup_mut(&mut self, handle: MeshHandle) -> &mut GpuMesh {
        let index = handle.index().expect("looked up an invalid mesh handle");
        &mut self.meshes[index]
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::types::TexturedVertex;

    #[test]
    fn normal_lines_duplicate_each_vertex() {
        let vertices = [
            TexturedVertex::new(Vec3::X, Vec3::Y, Vec2::ZERO),
            TexturedVertex::new(Vec3::Z, Vec3::X, Vec2::ONE),
        ];
        let lines = normal_lines(&vertices);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], lines[1]);
        assert_eq!(lines[2], UntexturedVertex::new(Vec3::Z, Vec3::X));
    }
}
