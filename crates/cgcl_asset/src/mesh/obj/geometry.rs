use std::collections::BTreeSet;

use gfx_maths::*;

/// Vertex attributes shared by every object of one OBJ file.
///
/// All pools only grow while parsing, so an index stays valid once handed out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlobalVertices {
    pub vertices: Vec<Vec3>,
    pub uv_vertices: Vec<Vec2>,
    /// Unit length, or zero when the file gave a zero vector.
    pub vertex_normals: Vec<Vec3>,
    pub vertex_colors: Vec<VertexColorsBlock>,
}

/// A run of colors for consecutive vertices starting at `start_vertex_index`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VertexColorsBlock {
    pub colors: Vec<Vec3>,
    pub start_vertex_index: usize,
}

impl GlobalVertices {
    pub(crate) fn push_vertex(&mut self, position: Vec3, color: Option<Vec3>) {
        let index = self.vertices.len();
        self.vertices.push(position);

        let color = match color {
            Some(color) => color,
            None => return,
        };
        match self.vertex_colors.last_mut() {
            Some(block) if block.start_vertex_index + block.colors.len() == index => {
                block.colors.push(color)
            }
            _ => self.vertex_colors.push(VertexColorsBlock {
                colors: vec![color],
                start_vertex_index: index,
            }),
        }
    }

    pub(crate) fn push_uv(&mut self, uv: Vec2) {
        self.uv_vertices.push(uv);
    }

    pub(crate) fn push_normal(&mut self, normal: Vec3) {
        let sqr_len = normal.sqr_magnitude();
        let normal = if sqr_len > 0.0 {
            normal * sqr_len.sqrt().recip()
        } else {
            normal
        };
        self.vertex_normals.push(normal);
    }

    /// Color of vertex `index`, if the file gave one.
    pub fn vertex_color(&self, index: usize) -> Option<Vec3> {
        self.vertex_colors.iter().find_map(|block| {
            index
                .checked_sub(block.start_vertex_index)
                .and_then(|offset| block.colors.get(offset))
                .copied()
        })
    }
}

/// One face corner. All indices are 0-based into [`GlobalVertices`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PolyCorner {
    pub vertex_index: usize,
    pub uv_index: Option<usize>,
    pub normal_index: Option<usize>,
}

/// One polygon, as a run of `corner_count` corners in [`Geometry::face_corners`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PolyElem {
    pub start_index: usize,
    pub corner_count: usize,
    pub shaded_smooth: bool,
}

/// A named object of an OBJ file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub vertices: BTreeSet<usize>,
    pub vertex_index_min: Option<usize>,
    pub vertex_index_max: Option<usize>,
    pub face_corners: Vec<PolyCorner>,
    pub face_elements: Vec<PolyElem>,
}

impl Geometry {
    pub(crate) fn track_vertex_index(&mut self, index: usize) {
        self.vertices.insert(index);
        self.vertex_index_min = Some(self.vertex_index_min.map_or(index, |min| min.min(index)));
        self.vertex_index_max = Some(self.vertex_index_max.map_or(index, |max| max.max(index)));
    }

    pub fn corners(&self, face: &PolyElem) -> &[PolyCorner] {
        &self.face_corners[face.start_index..face.start_index + face.corner_count]
    }
}

/// Accumulates objects while a file is scanned.
#[derive(Debug)]
pub(crate) struct ObjBuilder {
    pub(crate) global: GlobalVertices,
    pub(crate) geometries: Vec<Geometry>,
    pub(crate) shaded_smooth: bool,
}

impl Default for ObjBuilder {
    fn default() -> Self {
        Self {
            global: GlobalVertices::default(),
            geometries: vec![Geometry::default()],
            shaded_smooth: false,
        }
    }
}

impl ObjBuilder {
    pub(crate) fn current(&mut self) -> &mut Geometry {
        if self.geometries.is_empty() {
            self.geometries.push(Geometry::default());
        }
        let last = self.geometries.len() - 1;
        &mut self.geometries[last]
    }

    /// Opens a new object, unless the current one has no faces yet.
    pub(crate) fn set_object(&mut self, name: &str) {
        let current = self.current();
        if current.face_elements.is_empty() {
            current.name = name.into();
        } else {
            self.geometries.push(Geometry {
                name: name.into(),
                ..Geometry::default()
            });
        }
    }

    /// Appends a polygon made of `corners` to the current object.
    pub(crate) fn push_face(&mut self, corners: Vec<PolyCorner>) {
        let shaded_smooth = self.shaded_smooth;
        let geometry = self.current();
        let face = PolyElem {
            start_index: geometry.face_corners.len(),
            corner_count: corners.len(),
            shaded_smooth,
        };
        for corner in &corners {
            geometry.track_vertex_index(corner.vertex_index);
        }
        geometry.face_corners.extend(corners);
        geometry.face_elements.push(face);
    }

    pub(crate) fn finish(self) -> (Vec<Geometry>, GlobalVertices) {
        (self.geometries, self.global)
    }
}
