use crate::error::{FormatError, Result};
use gfx_maths::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One renderer-ready vertex. Fields are tightly packed in the order
/// position, normal, uv.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Flat vertex buffer plus a flat triangle list indexing into it.
///
/// Every three consecutive indices name one counter-clockwise triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the index buffer is a whole triangle list over `vertices`.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(FormatError::PartialTriangle(self.indices.len()));
        }

        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &index)| index as usize >= vertex_count)
        {
            return Err(FormatError::IndexOutOfBounds {
                index,
                position,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Moves `other` behind this mesh, rebasing its indices.
    pub fn append(&mut self, other: MeshData) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices
            .extend(other.indices.into_iter().map(|index| index + offset));
    }

    /// Scales every normal to unit length. Zero normals stay zero.
    pub fn normalize_normals(&mut self) {
        for vertex in &mut self.vertices {
            let sqr_len = vertex.normal.sqr_magnitude();
            if sqr_len > 0.0 {
                vertex.normal = vertex.normal * sqr_len.sqrt().recip();
            }
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mesh = bincode::deserialize::<MeshData>(&bytes)?;
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        MeshData::from_bytes(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }
}
