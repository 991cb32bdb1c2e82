use anyhow::{anyhow, Context, Result};
use cgcl_format::mesh::MeshData;
use std::path::{Path, PathBuf};

/// Extension of converted meshes.
pub const MESH_EXTENSION: &str = "mesh";

/// `<directory>/<stem of source>.<extension>`
pub fn sibling_path(directory: &Path, source: &Path, extension: &str) -> Result<PathBuf> {
    let mut name = source
        .file_stem()
        .ok_or_else(|| anyhow!("No file stem found: {}", source.display()))?
        .to_owned();
    name.push(".");
    name.push(extension);
    Ok(directory.join(name))
}

/// Serializes `mesh` into `output_dir`, named after the source file.
pub fn save_mesh(source: &Path, output_dir: &Path, mesh: &MeshData) -> Result<()> {
    let data = mesh.to_bytes().context("Could not serialize MeshData")?;
    let target = sibling_path(output_dir, source, MESH_EXTENSION)?;
    log::debug!(
        "Writing {} vertices and {} triangles to {}",
        mesh.vertices.len(),
        mesh.triangle_count(),
        target.display()
    );
    std::fs::write(&target, data)
        .with_context(|| format!("Could not write mesh: {}", target.display()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sibling_path() -> Result<()> {
        let path = sibling_path(Path::new("out"), Path::new("in/teapot.v2.bez"), "mesh")?;
        assert_eq!(path, Path::new("out/teapot.v2.mesh"));
        assert!(sibling_path(Path::new("out"), Path::new(".."), "mesh").is_err());
        Ok(())
    }
}
