mod bezier;
pub mod patch_file;
mod tessellate;

use anyhow::Context;
use cgcl_format::mesh::MeshData;
use log::info;
use std::{io, path::Path, path::PathBuf};

use crate::meta::AssetMeta;
use crate::scanner::{Location, NumericParseError};
use crate::utils;

pub use bezier::{bernstein, choose, BezierSurface, MAX_NET_SIZE};
pub use tessellate::tessellate;

#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("Control net of {n_us}x{n_vs} does not match {points} control points")]
    InvalidSurfaceDefinition { n_us: u32, n_vs: u32, points: usize },
    #[error("Control net of {n_us}x{n_vs} exceeds {} points per axis", bezier::MAX_NET_SIZE)]
    ControlNetTooLarge { n_us: u32, n_vs: u32 },
    #[error("Tessellation resolution {0} is out of range")]
    InvalidResolution(u32),
    #[error(transparent)]
    NumericParse(#[from] NumericParseError),
    #[error("Expected a non-negative count, got {value} at {location}")]
    InvalidCount { value: i64, location: Location },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Tessellates every patch of a patch file into one mesh.
pub fn load(path: &Path, meta: &AssetMeta) -> Result<MeshData, SurfaceError> {
    let mut mesh = MeshData::default();
    for patch in patch_file::read_patches(path)? {
        mesh.append(tessellate(&patch, meta.resolution)?);
    }
    Ok(mesh)
}

pub fn process(path: &Path, output_dir: &Path) -> anyhow::Result<()> {
    info!("Processing Bezier patch file: `{}`", path.display());
    let meta = AssetMeta::lookup(path, "bez")?;
    let mesh = load(path, &meta)
        .with_context(|| format!("Could not convert {}", path.display()))?;
    utils::save_mesh(path, output_dir, &mesh)
}
