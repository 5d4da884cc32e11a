//! Mesh ingestion: OBJ files flattened into per-triangle-corner buffers.

mod obj;

use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, SeaglowError};

pub use obj::{load_obj, parse_obj, FaceCorner, ObjMesh};

/// One triangle corner (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CornerVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Flat, non-indexed corner stream: three consecutive entries per triangle.
///
/// Replacing a buffer drops the old contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<CornerVertex>,
}

impl MeshBuffer {
    /// Expand indexed faces into the corner stream.
    ///
    /// Every corner must carry a texture coordinate index.
    pub fn from_obj(mesh: &ObjMesh) -> std::result::Result<Self, String> {
        let mut vertices = Vec::with_capacity(mesh.triangles.len() * 3);
        for (face, triangle) in mesh.triangles.iter().enumerate() {
            for corner in triangle {
                let uv_index = corner
                    .tex_coord
                    .ok_or_else(|| format!("face {} has a corner without a texture coordinate", face))?;
                vertices.push(CornerVertex {
                    position: mesh.positions[corner.position].to_array(),
                    uv: mesh.tex_coords[uv_index].to_array(),
                });
            }
        }
        Ok(Self { vertices })
    }

    /// Load an OBJ file and flatten it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let obj = load_obj(path)?;
        Self::from_obj(&obj).map_err(|e| SeaglowError::asset(path, e))
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}
