mod geometry;
mod parser;

use anyhow::{Context, Result};
use cgcl_format::mesh::MeshData;
use log::info;
use std::path::Path;

use crate::meta::AssetMeta;
use crate::utils;

use super::assemble::{self, Triangulation};

pub use geometry::{GlobalVertices, Geometry, PolyCorner, PolyElem, VertexColorsBlock};
pub use parser::{parse, parse_file, IndexKind, ParserError};

/// Parses an OBJ file and assembles all of its objects into one mesh.
pub fn load(path: &Path, meta: &AssetMeta) -> Result<MeshData> {
    let (geometries, global) = parse_file(path)?;
    let triangulation = if meta.triangulate {
        Triangulation::Fan
    } else {
        Triangulation::Passthrough
    };

    let mut mesh = assemble::assemble(&geometries, &global, triangulation);
    if meta.normalize_normals {
        mesh.normalize_normals();
    }
    Ok(mesh)
}

pub fn process(path: &Path, output_dir: &Path) -> Result<()> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let meta = AssetMeta::lookup(path, "obj")?;
    let mesh = load(path, &meta)
        .with_context(|| format!("Could not convert {}", path.display()))?;
    utils::save_mesh(path, output_dir, &mesh)
}
