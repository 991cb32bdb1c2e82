use std::{fs, path::PathBuf};

use anyhow::Result;
use cgcl_asset::{
    mesh::{
        assemble::{assemble, Triangulation},
        obj,
    },
    meta::AssetMeta,
    surface,
};
use cgcl_format::mesh::MeshData;
use float_cmp::approx_eq;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_cube() -> Result<()> {
    let (geometries, global) = obj::parse_file(&data("cube.obj"))?;

    assert_eq!(geometries.len(), 1);
    assert_eq!(geometries[0].name, "Cube");
    assert_eq!(geometries[0].face_elements.len(), 12);
    assert_eq!(geometries[0].vertices.len(), 8);
    assert_eq!(global.uv_vertices.len(), 4);
    assert!(geometries[0].face_elements.iter().all(|f| !f.shaded_smooth));

    let mut mesh = assemble(&geometries, &global, Triangulation::Passthrough);
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.triangle_count(), 12);
    mesh.validate()?;

    // corner (-1, -1, -1) is used twice by each of its three sides
    assert_eq!(mesh.vertices[0].normal, gfx_maths::Vec3::new(-2.0, -2.0, -2.0));
    for vertex in &mesh.vertices {
        let (n, p) = (vertex.normal, vertex.position);
        assert!(n.x * p.x + n.y * p.y + n.z * p.z > 0.0);
    }

    mesh.normalize_normals();
    for vertex in &mesh.vertices {
        assert!(approx_eq!(f32, vertex.normal.sqr_magnitude(), 1.0, epsilon = 1e-5));
    }
    Ok(())
}

#[test]
fn test_patch_file() -> Result<()> {
    let patches = surface::patch_file::read_patches(&data("patch.bez"))?;
    assert_eq!(patches.len(), 2);

    let meta = AssetMeta::lookup(&data("patch.bez"), "bez")?;
    assert_eq!(meta.resolution, 2);

    let mesh = surface::load(&data("patch.bez"), &meta)?;
    assert_eq!(mesh.vertices.len(), 8 * 8 + 4 * 4);
    assert_eq!(mesh.triangle_count(), 7 * 7 * 2 + 3 * 3 * 2);
    mesh.validate()?;

    // the second patch starts where the first one ends
    assert_eq!(mesh.vertices[63].position, patches[0].ctrl_pts()[15]);
    assert_eq!(mesh.vertices[64].position, patches[1].ctrl_pts()[0]);
    assert_eq!(mesh.indices[98 * 3], 64);
    Ok(())
}

#[test]
fn test_process_writes_meshes() -> Result<()> {
    let output = tempfile::tempdir()?;

    obj::process(&data("cube.obj"), output.path())?;
    surface::process(&data("patch.bez"), output.path())?;

    let cube = MeshData::from_file(&output.path().join("cube.mesh"))?;
    assert_eq!(cube, obj::load(&data("cube.obj"), &AssetMeta::default())?);

    let patch = MeshData::from_file(&output.path().join("patch.mesh"))?;
    assert_eq!(patch.vertices.len(), 80);
    Ok(())
}

#[test]
fn test_process_triangulates_on_request() -> Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;

    let quad = input.path().join("quad.obj");
    fs::write(&quad, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 2\nf 1//1 2//1 3//1 4//1\n")?;
    fs::write(input.path().join("obj.toml"), "triangulate = true\nnormalize_normals = true\n")?;

    obj::process(&quad, output.path())?;
    let mesh = MeshData::from_file(&output.path().join("quad.mesh"))?;
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    assert!(mesh
        .vertices
        .iter()
        .all(|v| approx_eq!(f32, v.normal.z, 1.0, epsilon = 1e-6)));
    Ok(())
}

#[test]
fn test_process_reports_bad_input() {
    let output = tempfile::tempdir().unwrap();
    let err = obj::process(&data("missing.obj"), output.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.obj"));
}
