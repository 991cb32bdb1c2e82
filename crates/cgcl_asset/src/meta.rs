use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils;

/// Per-asset conversion settings, read from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetMeta {
    /// Grid samples per control point along each axis when tessellating
    /// Bezier patches.
    pub resolution: u32,
    /// Fan-triangulate OBJ faces with more than three corners.
    pub triangulate: bool,
    /// Scale the summed vertex normals to unit length after assembly.
    pub normalize_normals: bool,
}

impl Default for AssetMeta {
    fn default() -> Self {
        Self {
            resolution: 3,
            triangulate: false,
            normalize_normals: false,
        }
    }
}

impl AssetMeta {
    pub fn parse(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let meta: Self = toml::from_str(&data)
            .with_context(|| format!("Invalid meta file: {}", path.display()))?;
        Ok(meta)
    }

    /// Reads the meta of `path` from `<file>.toml` next to it, or else from the
    /// folder scoped `<kind>.toml`, or else falls back to the defaults.
    pub fn lookup(path: &Path, kind: &str) -> Result<Self> {
        let dir = path
            .parent()
            .with_context(|| format!("Path terminates in root or prefix: {}", path.display()))?;

        let own = utils::sibling_path(dir, path, "toml")?;
        if own.is_file() {
            return Self::parse(&own);
        }

        let folder = dir.join(format!("{}.toml", kind));
        if folder.is_file() {
            return Self::parse(&folder);
        }

        Ok(Self::default())
    }
}
