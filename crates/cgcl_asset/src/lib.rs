//! Asset pipeline of the cgcl toolkit: Wavefront OBJ parsing, Bezier patch
//! tessellation and assembly of both into flat [`cgcl_format::mesh::MeshData`].

pub mod mesh;
pub mod meta;
pub mod scanner;
pub mod surface;
pub mod utils;
