use thiserror::Error;

use crate::Vertex;

/// The maximum amount of vertices any one mesh can have.
pub const MAX_VERTEX_COUNT: u32 = (1 << 24) - 1;

/// Error returned from mesh validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshValidationError {
    #[error("Mesh has no vertices")]
    Empty,
    #[error("Mesh has {count} vertices when the vertex limit is {MAX_VERTEX_COUNT}")]
    ExceededMaxVertexCount { count: usize },
    #[error("Mesh has {count} vertices which is not a multiple of three. Meshes are always composed of triangles")]
    VertexCountNotMultipleOfThree { count: usize },
    #[error("Vertex {index} has a non-finite position or normal")]
    NonFiniteVertex { index: usize },
}

/// A triangle list: every three consecutive vertices form a triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V> {
    vertices: Vec<V>,
}

impl<V: Vertex> Mesh<V> {
    pub fn new(vertices: Vec<V>) -> Result<Self, MeshValidationError> {
        let mesh = Self { vertices };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn validate(&self) -> Result<(), MeshValidationError> {
        let count = self.vertices.len();
        if count == 0 {
            return Err(MeshValidationError::Empty);
        }
        if count > MAX_VERTEX_COUNT as usize {
            return Err(MeshValidationError::ExceededMaxVertexCount { count });
        }
        if count % 3 != 0 {
            return Err(MeshValidationError::VertexCountNotMultipleOfThree { count });
        }
        if let Some(index) = self
            .vertices
            .iter()
            .position(|v| !v.position().is_finite() || !v.normal().is_finite())
        {
            return Err(MeshValidationError::NonFiniteVertex { index });
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn into_vertices(self) -> Vec<V> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::UntexturedVertex;

    fn vertex() -> UntexturedVertex {
        UntexturedVertex::new(Vec3::ZERO, Vec3::Z)
    }

    #[test]
    fn rejects_partial_triangles() {
        assert_eq!(
            Mesh::new(vec![vertex(); 4]).unwrap_err(),
            MeshValidationError::VertexCountNotMultipleOfThree { count: 4 }
        );
        assert_eq!(Mesh::<UntexturedVertex>::new(Vec::new()).unwrap_err(), MeshValidationError::Empty);
    }

    #[test]
    fn rejects_nan() {
        let mut vertices = vec![vertex(); 3];
        vertices[2].normal = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(
            Mesh::new(vertices).unwrap_err(),
            MeshValidationError::NonFiniteVertex { index: 2 }
        );
    }

    #[test]
    fn accepts_triangles() {
        let mesh = Mesh::new(vec![vertex(); 6]).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }
}
