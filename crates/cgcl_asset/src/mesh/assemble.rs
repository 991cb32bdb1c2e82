//! Turns parsed OBJ objects into one flat vertex/index buffer.
//!
//! There is one output vertex per position of the file. A vertex's normal is
//! the plain sum of the normals referenced by every corner that uses it, left
//! unnormalized; call [`MeshData::normalize_normals`] if unit normals are
//! needed. Texture coordinates are not transferred and stay zero.

use cgcl_format::mesh::{MeshData, Vertex};
use log::{debug, warn};

use super::obj::{Geometry, GlobalVertices, PolyCorner};

/// How polygons are turned into the index buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Triangulation {
    /// Every corner index is appended as-is. Only correct when every face of
    /// the input is already a triangle.
    #[default]
    Passthrough,
    /// Polygons are split into a fan around their first corner. Assumes convex faces.
    Fan,
}

pub fn assemble(
    geometries: &[Geometry],
    global: &GlobalVertices,
    triangulation: Triangulation,
) -> MeshData {
    let mut vertices: Vec<Vertex> = global.vertices.iter().copied().map(Vertex::at).collect();
    let mut indices: Vec<u32> = Vec::new();
    let mut polygons = 0;

    for geometry in geometries {
        debug!(
            "Assembling object {:?} with {} faces",
            geometry.name,
            geometry.face_elements.len()
        );

        for face in &geometry.face_elements {
            let corners = geometry.corners(face);
            for corner in corners {
                accumulate_normal(&mut vertices, global, corner);
            }

            if corners.len() != 3 {
                polygons += 1;
            }
            match triangulation {
                Triangulation::Passthrough => {
                    indices.extend(corners.iter().map(|c| c.vertex_index as u32))
                }
                Triangulation::Fan => {
                    // triangulate polygons for convex shapes
                    for i in 2..corners.len() {
                        indices.extend([
                            corners[0].vertex_index as u32,
                            corners[i - 1].vertex_index as u32,
                            corners[i].vertex_index as u32,
                        ]);
                    }
                }
            }
        }
    }

    if polygons > 0 && triangulation == Triangulation::Passthrough {
        warn!(
            "{} faces are not triangles and were copied without triangulation",
            polygons
        );
    }

    MeshData { vertices, indices }
}

fn accumulate_normal(vertices: &mut [Vertex], global: &GlobalVertices, corner: &PolyCorner) {
    if let Some(normal) = corner
        .normal_index
        .and_then(|index| global.vertex_normals.get(index))
    {
        vertices[corner.vertex_index].normal += *normal;
    }
}
