//! Reader for Bezier patch files.
//!
//! A patch file is a whitespace separated list of numbers: the patch count,
//! then for every patch its control net size `n_us n_vs` followed by
//! `n_us * n_vs` control points as `x y z` triples.

use std::{fs, path::Path};

use gfx_maths::*;
use log::debug;

use super::{BezierSurface, SurfaceError};
use crate::scanner::Scanner;

pub fn read_patches(path: &Path) -> Result<Vec<BezierSurface>, SurfaceError> {
    log::info!("Loading patches: {}", path.display());
    let bytes = fs::read(path).map_err(|source| SurfaceError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_patches(&String::from_utf8_lossy(&bytes))
}

pub fn parse_patches(input: &str) -> Result<Vec<BezierSurface>, SurfaceError> {
    let mut scanner = Scanner::new(input);

    let patch_count = parse_count(&mut scanner)?;
    let mut patches = Vec::with_capacity(patch_count.min(1024) as usize);
    for _ in 0..patch_count {
        let n_us = parse_count(&mut scanner)?;
        let n_vs = parse_count(&mut scanner)?;

        let points = n_us as usize * n_vs as usize;
        let mut ctrl_pts = Vec::with_capacity(points);
        for _ in 0..points {
            let mut xyz = [0.0; 3];
            for value in xyz.iter_mut() {
                scanner.skip_whitespace();
                *value = scanner.parse_float()?;
            }
            ctrl_pts.push(Vec3::from(xyz));
        }

        patches.push(BezierSurface::new(n_us, n_vs, ctrl_pts)?);
    }

    debug!("Read {} patches", patches.len());
    Ok(patches)
}

fn parse_count(scanner: &mut Scanner<'_>) -> Result<u32, SurfaceError> {
    scanner.skip_whitespace();
    let location = scanner.location();
    let value = scanner.parse_int()?;
    u32::try_from(value).map_err(|_| SurfaceError::InvalidCount { value, location })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_patches() -> Result<(), SurfaceError> {
        let input = "2\n\
                     2 2\n0 0 0  0 1 0\n1 0 0  1 1 1\n\
                     1 3\r\n0 0 0\r\n0.5 0 1e-1\r\n1 0 0\r\n";
        let patches = parse_patches(input)?;

        assert_eq!(patches.len(), 2);
        assert_eq!((patches[0].n_us(), patches[0].n_vs()), (2, 2));
        assert_eq!(patches[0].ctrl_pts()[3], Vec3::new(1.0, 1.0, 1.0));
        assert_eq!((patches[1].n_us(), patches[1].n_vs()), (1, 3));
        assert_eq!(patches[1].ctrl_pts()[1], Vec3::new(0.5, 0.0, 0.1));
        Ok(())
    }

    #[test]
    fn test_read_patches_non_utf8() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("latin1.bez");
        fs::write(&path, b"1\n1 1\n0.5 1 2\n\xff\xfe")?;

        let patches = read_patches(&path)?;
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].ctrl_pts()[0], Vec3::new(0.5, 1.0, 2.0));
        Ok(())
    }

    #[test]
    fn test_parse_patches_truncated() {
        let result = parse_patches("1\n2 2\n0 0 0\n0 1 0\n1 0 0\n");
        match result {
            Err(SurfaceError::NumericParse(err)) => assert_eq!(err.location.line, 6),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_patches_negative_count() {
        assert!(matches!(
            parse_patches("1\n-2 2\n"),
            Err(SurfaceError::InvalidCount { value: -2, .. })
        ));
    }

    #[test]
    fn test_parse_patches_empty_net() {
        assert!(matches!(
            parse_patches("1\n0 4\n"),
            Err(SurfaceError::InvalidSurfaceDefinition { n_us: 0, .. })
        ));
    }
}
