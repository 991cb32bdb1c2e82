use cgcl_format::mesh::{MeshData, Vertex};
use log::debug;
use rayon::prelude::*;

use super::{BezierSurface, SurfaceError};

/// Samples `surface` on a regular `(n_us * resolution) x (n_vs * resolution)`
/// grid and stitches neighbouring samples into triangles.
///
/// The first and last grid rows/columns lie exactly on the patch border.
/// Normals and texture coordinates are left zero.
pub fn tessellate(surface: &BezierSurface, resolution: u32) -> Result<MeshData, SurfaceError> {
    let out_of_range = || SurfaceError::InvalidResolution(resolution);
    if resolution == 0 {
        return Err(out_of_range());
    }

    let u_count = surface.n_us().checked_mul(resolution).ok_or_else(out_of_range)?;
    let v_count = surface.n_vs().checked_mul(resolution).ok_or_else(out_of_range)?;
    // every vertex index has to fit into the u32 index buffer
    let vertex_count = u_count.checked_mul(v_count).ok_or_else(out_of_range)?;

    // i / (count - 1) lands exactly on 1.0 for the last sample
    let param = |i: u32, count: u32| {
        if count > 1 {
            i as f32 / (count - 1) as f32
        } else {
            0.0
        }
    };

    let vertices: Vec<Vertex> = (0..vertex_count)
        .into_par_iter()
        .map(|idx| {
            let (i, j) = (idx / v_count, idx % v_count);
            Vertex::at(surface.evaluate(param(i, u_count), param(j, v_count)))
        })
        .collect();

    let cells = (u_count.saturating_sub(1) * v_count.saturating_sub(1)) as usize;
    let mut indices: Vec<u32> = Vec::with_capacity(cells * 6);
    for i in 0..u_count.saturating_sub(1) {
        for j in 0..v_count.saturating_sub(1) {
            let idx = i * v_count + j;
            indices.extend([idx, idx + 1, idx + v_count]);
            indices.extend([idx + 1, idx + v_count, idx + v_count + 1]);
        }
    }

    debug!(
        "Tessellated {}x{} patch into {} vertices and {} triangles",
        surface.n_us(),
        surface.n_vs(),
        vertices.len(),
        indices.len() / 3
    );

    Ok(MeshData { vertices, indices })
}
