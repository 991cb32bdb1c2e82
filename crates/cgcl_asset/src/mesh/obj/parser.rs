use std::{fmt, fs, io};
use std::path::{Path, PathBuf};

use gfx_maths::*;
use log::{debug, warn};

use super::geometry::*;
use crate::scanner::{Location, NumericParseError, Scanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    Uv,
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Vertex => write!(f, "vertex"),
            IndexKind::Uv => write!(f, "texture coordinate"),
            IndexKind::Normal => write!(f, "normal"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    NumericParse(#[from] NumericParseError),
    /// `index` is the 1-based value as written in the file.
    #[error("Face refers to {kind} {index} but only {len} are defined, at {location}")]
    IndexOutOfRange {
        kind: IndexKind,
        index: i64,
        len: usize,
        location: Location,
    },
    #[error("Face has {corners} corners, at least 3 are needed, at {location}")]
    MalformedFace { corners: usize, location: Location },
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Reads and parses a Wavefront OBJ file.
pub fn parse_file(path: &Path) -> Result<(Vec<Geometry>, GlobalVertices)> {
    log::info!("Loading mesh: {}", path.display());
    let bytes = fs::read(path).map_err(|source| ParserError::Io {
        path: path.to_owned(),
        source,
    })?;
    // exporters write names and comments in whatever encoding they like
    parse(&String::from_utf8_lossy(&bytes))
}

// parses wavefront obj (https://en.wikipedia.org/wiki/Wavefront_.obj_file)
// in a single forward scan; any error aborts the whole parse
pub fn parse(input: &str) -> Result<(Vec<Geometry>, GlobalVertices)> {
    let mut scanner = Scanner::new(input);
    let mut builder = ObjBuilder::default();

    loop {
        scanner.skip_whitespace();
        if scanner.is_at_end() {
            break;
        }
        parse_token(&mut scanner, &mut builder)?;
        scanner.skip_line();
    }

    let (geometries, global) = builder.finish();
    debug!(
        "Parsed {} vertices, {} uvs, {} normals in {} object(s)",
        global.vertices.len(),
        global.uv_vertices.len(),
        global.vertex_normals.len(),
        geometries.len()
    );
    Ok((geometries, global))
}

fn parse_token(scanner: &mut Scanner<'_>, builder: &mut ObjBuilder) -> Result<()> {
    match scanner.peek() {
        // comment
        Some(b'#') => {}
        Some(b'v') => {
            if scanner.expect_keyword("v") {
                parse_vertex(scanner, builder)?;
            } else if scanner.expect_keyword("vt") {
                let uv = parse_floats::<2>(scanner)?;
                builder.global.push_uv(uv.into());
            } else if scanner.expect_keyword("vn") {
                let normal = parse_floats::<3>(scanner)?;
                builder.global.push_normal(normal.into());
            } else {
                let location = scanner.location();
                let directive = scanner.word();
                debug!("Skipping unsupported vertex data {:?} at {}", directive, location);
            }
        }
        Some(b'f') if scanner.expect_keyword("f") => parse_face(scanner, builder)?,
        // name
        Some(b'o') if scanner.expect_keyword("o") => {
            let name = scanner.rest_of_line();
            builder.set_object(name);
        }
        // smoothing groups
        Some(b's') if scanner.expect_keyword("s") => {
            builder.shaded_smooth = parse_smooth(scanner)?;
        }
        Some(b'u') if scanner.expect_keyword("usemtl") => {
            warn!("Materials not yet supported. Ignoring.")
        }
        _ => {
            let line = scanner.location().line;
            let directive = scanner.word();
            debug!("Skipping unknown directive {:?} at line {}", directive, line);
        }
    }

    Ok(())
}

fn parse_floats<const N: usize>(scanner: &mut Scanner<'_>) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        *value = scanner.parse_float()?;
    }
    Ok(values)
}

// a vertex carries an optional rgb color after its position
fn parse_vertex(scanner: &mut Scanner<'_>, builder: &mut ObjBuilder) -> Result<()> {
    let position = parse_floats::<3>(scanner)?;

    let mut extra = Vec::new();
    while !scanner.at_line_end() {
        extra.push(scanner.parse_float()?);
    }
    let color = if extra.len() == 3 {
        Some(Vec3::new(extra[0], extra[1], extra[2]))
    } else {
        None
    };

    builder.global.push_vertex(position.into(), color);
    Ok(())
}

// "0", "off" and "null" turn smooth shading off, any other integer turns it on
fn parse_smooth(scanner: &mut Scanner<'_>) -> Result<bool> {
    scanner.skip_inline_whitespace();
    if scanner.expect_keyword("off") || scanner.expect_keyword("null") {
        return Ok(false);
    }
    Ok(scanner.parse_int()? != 0)
}

// parses corners seperated by whitespace until the end of the line
fn parse_face(scanner: &mut Scanner<'_>, builder: &mut ObjBuilder) -> Result<()> {
    let location = scanner.location();
    let mut corners = Vec::new();

    while !scanner.at_line_end() {
        corners.push(parse_corner(scanner, &builder.global)?);
    }

    if corners.len() < 3 {
        return Err(ParserError::MalformedFace {
            corners: corners.len(),
            location,
        });
    }

    builder.push_face(corners);
    Ok(())
}

// parses a single `v`, `v/vt`, `v//vn` or `v/vt/vn` corner
fn parse_corner(scanner: &mut Scanner<'_>, global: &GlobalVertices) -> Result<PolyCorner> {
    let location = scanner.location();
    let vertex = scanner.parse_int()?;
    let mut uv = None;
    let mut normal = None;

    if scanner.eat(b'/') {
        if scanner.peek() != Some(b'/') {
            uv = Some(scanner.parse_int()?);
        }
        if scanner.eat(b'/') {
            normal = Some(scanner.parse_int()?);
        }
    }

    let vertex_index = resolve_index(IndexKind::Vertex, vertex, global.vertices.len(), location)?;
    let uv_index = uv
        .map(|uv| resolve_index(IndexKind::Uv, uv, global.uv_vertices.len(), location))
        .transpose()?;

    // some files refer to normals that were stripped from them
    let normal_index = match normal {
        Some(normal) if !global.vertex_normals.is_empty() => Some(resolve_index(
            IndexKind::Normal,
            normal,
            global.vertex_normals.len(),
            location,
        )?),
        _ => None,
    };

    Ok(PolyCorner {
        vertex_index,
        uv_index,
        normal_index,
    })
}

/// Turns a 1-based file index into a checked 0-based one.
fn resolve_index(kind: IndexKind, index: i64, len: usize, location: Location) -> Result<usize> {
    match usize::try_from(index - 1) {
        Ok(resolved) if resolved < len => Ok(resolved),
        _ => Err(ParserError::IndexOutOfRange {
            kind,
            index,
            len,
            location,
        }),
    }
}
