//! Minimal Wavefront OBJ reader.
//!
//! Understands `v`, `vt` and `f` records; everything else is skipped.
//! Polygon faces are triangulated with a fan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::error::{Result, SeaglowError};

/// Position and texture-coordinate index of one face corner (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: usize,
    pub tex_coord: Option<usize>,
}

/// Indexed triangle mesh as stored in the file
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub positions: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub triangles: Vec<[FaceCorner; 3]>,
}

impl ObjMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// OBJ indices are 1-based; negative values count back from the end
fn resolve_index(token: &str, len: usize, line_no: usize) -> std::result::Result<usize, String> {
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("line {}: bad index '{}'", line_no, token))?;
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        return Err(format!("line {}: index 0 is not valid", line_no));
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(format!(
            "line {}: index {} out of bounds (1..={})",
            line_no, raw, len
        ));
    }
    Ok(resolved as usize)
}

fn parse_corner(
    token: &str,
    mesh: &ObjMesh,
    line_no: usize,
) -> std::result::Result<FaceCorner, String> {
    let mut parts = token.split('/');
    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, mesh.positions.len(), line_no)?,
        _ => return Err(format!("line {}: face corner without position", line_no)),
    };
    let tex_coord = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, mesh.tex_coords.len(), line_no)?),
        _ => None,
    };
    Ok(FaceCorner {
        position,
        tex_coord,
    })
}

fn parse_floats<const N: usize>(
    mut fields: std::str::SplitWhitespace<'_>,
    line_no: usize,
) -> std::result::Result<[f32; N], String> {
    let mut out = [0.0f32; N];
    for slot in out.iter_mut() {
        let field = fields
            .next()
            .ok_or_else(|| format!("line {}: expected {} components", line_no, N))?;
        *slot = field
            .parse()
            .map_err(|_| format!("line {}: bad number '{}'", line_no, field))?;
    }
    Ok(out)
}

/// Parse OBJ text from any buffered reader
pub fn parse_obj<R: BufRead>(reader: R) -> std::result::Result<ObjMesh, String> {
    let mut mesh = ObjMesh::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| format!("line {}: {}", line_no, e))?;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let mut fields = s.split_whitespace();
        let tag = fields.next().unwrap_or("");
        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(fields, line_no)?;
                mesh.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                // Optional third component (w) is ignored
                let [u, v] = parse_floats::<2>(fields, line_no)?;
                mesh.tex_coords.push(Vec2::new(u, v));
            }
            "f" => {
                let corners = fields
                    .map(|tok| parse_corner(tok, &mesh, line_no))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(format!(
                        "line {}: face has fewer than 3 vertices",
                        line_no
                    ));
                }
                for t in 1..corners.len() - 1 {
                    mesh.triangles.push([corners[0], corners[t], corners[t + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Read and parse an OBJ file from disk
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ObjMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SeaglowError::asset(path, e))?;
    let mesh = parse_obj(BufReader::new(file)).map_err(|e| SeaglowError::asset(path, e))?;
    log::info!(
        "Loaded {} ({} positions, {} texcoords, {} triangles)",
        path.display(),
        mesh.positions.len(),
        mesh.tex_coords.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.tex_coords.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        let first: Vec<usize> = mesh.triangles[0].iter().map(|c| c.position).collect();
        let second: Vec<usize> = mesh.triangles[1].iter().map(|c| c.position).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![0, 2, 3]);
        assert_eq!(mesh.triangles[1][2].tex_coord, Some(3));
    }

    #[test]
    fn test_normals_and_negative_indices() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 0 1
vt 0 0
vt 1 0
vt 0 1
vn 0 1 0
f -3/-3/1 -2/-2/1 -1/-1/1
";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        let tri = mesh.triangles[0];
        assert_eq!(tri[0].position, 0);
        assert_eq!(tri[2].position, 2);
        assert_eq!(tri[2].tex_coord, Some(2));
    }

    #[test]
    fn test_corner_without_texcoord() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        assert!(mesh.triangles[0].iter().all(|c| c.tex_coord.is_none()));
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = parse_obj(text.as_bytes()).unwrap_err();
        assert!(err.contains("line 3"), "{}", err);
    }

    #[test]
    fn test_degenerate_face_is_an_error() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert!(parse_obj(text.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file_is_asset_failure() {
        let err = load_obj("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, SeaglowError::AssetLoad { .. }));
        assert!(!err.is_fatal());
    }
}
