//! Canonical light quads from a triangulated light mesh.
//!
//! Each light panel arrives as two triangles, six corners:
//!
//! ```text
//! 0 bottom-left, 1 bottom-right, 2 top-right,
//! 3 bottom-right, 4 top-right, 5 top-left
//! ```
//!
//! Corners 3 and 4 repeat 1 and 2, so a panel reduces to corners
//! {0, 1, 2, 5}.

use glam::{Vec2, Vec3};

use crate::error::{Result, SeaglowError};
use crate::mesh::MeshBuffer;

/// Corners per panel in the source mesh
pub const CORNERS_PER_PANEL: usize = 6;

/// Position of a panel corner in object space and in texture space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCorner {
    pub position: Vec3,
    pub uv: Vec2,
}

/// Role of a corner within a quad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerRole {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl CornerRole {
    /// Quad order used everywhere downstream
    pub const ALL: [CornerRole; 4] = [
        CornerRole::BottomLeft,
        CornerRole::BottomRight,
        CornerRole::TopRight,
        CornerRole::TopLeft,
    ];

    /// Offset of this corner inside a six-corner panel block
    pub fn source_offset(self) -> usize {
        match self {
            CornerRole::BottomLeft => 0,
            CornerRole::BottomRight => 1,
            CornerRole::TopRight => 2,
            CornerRole::TopLeft => 5,
        }
    }

    /// Whether `candidate` pushes the reference envelope outward for this
    /// role. Ties count as extending, so later panels win them.
    pub fn extends(self, candidate: Vec2, current: Vec2) -> bool {
        match self {
            CornerRole::BottomLeft => candidate.x <= current.x && candidate.y <= current.y,
            CornerRole::BottomRight => candidate.x >= current.x && candidate.y <= current.y,
            CornerRole::TopRight => candidate.x >= current.x && candidate.y >= current.y,
            CornerRole::TopLeft => candidate.x <= current.x && candidate.y >= current.y,
        }
    }
}

/// One light panel, corners in bottom-left, bottom-right, top-right,
/// top-left order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalLightQuad {
    pub corners: [LightCorner; 4],
}

impl CanonicalLightQuad {
    pub fn corner(&self, role: CornerRole) -> LightCorner {
        self.corners[role as usize]
    }

    pub fn positions(&self) -> [Vec3; 4] {
        self.corners.map(|c| c.position)
    }
}

/// Texture-space envelope of all panels, used to stretch one light
/// texture across every panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceProjectionQuad {
    pub corners: [LightCorner; 4],
}

impl ReferenceProjectionQuad {
    pub fn corner(&self, role: CornerRole) -> LightCorner {
        self.corners[role as usize]
    }

    pub fn positions(&self) -> [Vec3; 4] {
        self.corners.map(|c| c.position)
    }

    pub fn uvs(&self) -> [Vec2; 4] {
        self.corners.map(|c| c.uv)
    }
}

/// Everything the illumination stage needs about the light panels
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLightGeometry {
    quads: Vec<CanonicalLightQuad>,
    reference: ReferenceProjectionQuad,
}

impl AreaLightGeometry {
    /// Reduce a six-corners-per-panel mesh to canonical quads.
    ///
    /// Fails with `MalformedLightMesh` for an empty mesh or a corner count
    /// that is not a multiple of six.
    pub fn extract(mesh: &MeshBuffer) -> Result<Self> {
        let corner_count = mesh.len();
        if corner_count == 0 {
            return Err(SeaglowError::MalformedLightMesh(
                "light mesh has no panels".to_string(),
            ));
        }
        if corner_count % CORNERS_PER_PANEL != 0 {
            return Err(SeaglowError::MalformedLightMesh(format!(
                "{} corners is not a multiple of {}",
                corner_count, CORNERS_PER_PANEL
            )));
        }

        let quads = mesh
            .vertices
            .chunks_exact(CORNERS_PER_PANEL)
            .map(|panel| CanonicalLightQuad {
                corners: CornerRole::ALL.map(|role| {
                    let v = panel[role.source_offset()];
                    LightCorner {
                        position: Vec3::from_array(v.position),
                        uv: Vec2::from_array(v.uv),
                    }
                }),
            })
            .collect::<Vec<_>>();

        let mut reference = ReferenceProjectionQuad {
            corners: quads[0].corners,
        };
        for quad in &quads[1..] {
            for role in CornerRole::ALL {
                let candidate = quad.corner(role);
                let slot = &mut reference.corners[role as usize];
                if role.extends(candidate.uv, slot.uv) {
                    *slot = candidate;
                }
            }
        }

        log::info!("Extracted {} area light panels", quads.len());
        Ok(Self { quads, reference })
    }

    pub fn quads(&self) -> &[CanonicalLightQuad] {
        &self.quads
    }

    pub fn reference(&self) -> &ReferenceProjectionQuad {
        &self.reference
    }

    pub fn panel_count(&self) -> usize {
        self.quads.len()
    }

    /// All canonical corners, four per panel, in panel order
    pub fn corner_positions(&self) -> Vec<Vec3> {
        self.quads.iter().flat_map(|q| q.positions()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CornerVertex;

    /// Six corners of an axis-aligned panel in the XY plane
    fn panel(origin: Vec3, size: f32, uv_min: Vec2, uv_size: f32) -> Vec<CornerVertex> {
        let bl = (origin, uv_min);
        let br = (origin + Vec3::X * size, uv_min + Vec2::X * uv_size);
        let tr = (origin + Vec3::new(size, size, 0.0), uv_min + Vec2::splat(uv_size));
        let tl = (origin + Vec3::Y * size, uv_min + Vec2::Y * uv_size);
        [bl, br, tr, br, tr, tl]
            .iter()
            .map(|(p, uv)| CornerVertex {
                position: p.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    fn mesh(panels: Vec<Vec<CornerVertex>>) -> MeshBuffer {
        MeshBuffer {
            vertices: panels.into_iter().flatten().collect(),
        }
    }

    #[test]
    fn test_single_panel() {
        let light = mesh(vec![panel(Vec3::new(-1.0, 2.0, -5.0), 2.0, Vec2::ZERO, 1.0)]);
        let geometry = AreaLightGeometry::extract(&light).unwrap();
        assert_eq!(geometry.panel_count(), 1);

        let quad = geometry.quads()[0];
        assert_eq!(
            quad.positions(),
            [
                Vec3::new(-1.0, 2.0, -5.0),
                Vec3::new(1.0, 2.0, -5.0),
                Vec3::new(1.0, 4.0, -5.0),
                Vec3::new(-1.0, 4.0, -5.0),
            ]
        );
        assert_eq!(quad.corner(CornerRole::TopLeft).uv, Vec2::new(0.0, 1.0));
        assert_eq!(geometry.reference().corners, quad.corners);
    }

    #[test]
    fn test_duplicate_corners_are_skipped() {
        let mut corners = panel(Vec3::ZERO, 1.0, Vec2::ZERO, 1.0);
        // Corrupt the redundant copies; the result must not change
        corners[3].position = [99.0, 99.0, 99.0];
        corners[4].uv = [-7.0, -7.0];
        let geometry = AreaLightGeometry::extract(&mesh(vec![corners])).unwrap();
        assert!(geometry.corner_positions().iter().all(|p| p.x < 2.0));
        assert!(geometry.reference().uvs().iter().all(|uv| uv.x >= 0.0));
    }

    #[test]
    fn test_reference_bottom_left_takes_lower_panel() {
        let first = panel(Vec3::ZERO, 1.0, Vec2::new(0.5, 0.5), 0.5);
        let second = panel(Vec3::X * 3.0, 1.0, Vec2::new(0.0, 0.0), 0.5);
        let geometry = AreaLightGeometry::extract(&mesh(vec![first, second])).unwrap();

        let bl = geometry.reference().corner(CornerRole::BottomLeft);
        assert_eq!(bl, geometry.quads()[1].corner(CornerRole::BottomLeft));
        assert_eq!(bl.position, Vec3::X * 3.0);

        // The upper-right corner stays with the first panel
        let tr = geometry.reference().corner(CornerRole::TopRight);
        assert_eq!(tr, geometry.quads()[0].corner(CornerRole::TopRight));
    }

    #[test]
    fn test_reference_spans_a_texture_atlas() {
        // Four panels tiling the unit texture square as a 2x2 atlas
        let panels = vec![
            panel(Vec3::new(0.0, 0.0, 0.0), 1.0, Vec2::new(0.0, 0.0), 0.5),
            panel(Vec3::new(2.0, 0.0, 0.0), 1.0, Vec2::new(0.5, 0.0), 0.5),
            panel(Vec3::new(2.0, 2.0, 0.0), 1.0, Vec2::new(0.5, 0.5), 0.5),
            panel(Vec3::new(0.0, 2.0, 0.0), 1.0, Vec2::new(0.0, 0.5), 0.5),
        ];
        let geometry = AreaLightGeometry::extract(&mesh(panels)).unwrap();
        assert_eq!(
            geometry.reference().uvs(),
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]
        );
        assert_eq!(
            geometry.reference().positions(),
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(3.0, 3.0, 0.0),
                Vec3::new(0.0, 3.0, 0.0),
            ]
        );
        assert_eq!(geometry.corner_positions().len(), 16);
    }

    #[test]
    fn test_tied_texture_coordinates_go_to_the_later_panel() {
        let first = panel(Vec3::ZERO, 1.0, Vec2::ZERO, 1.0);
        let second = panel(Vec3::Z * 4.0, 1.0, Vec2::ZERO, 1.0);
        let geometry = AreaLightGeometry::extract(&mesh(vec![first, second])).unwrap();
        for role in CornerRole::ALL {
            assert_eq!(
                geometry.reference().corner(role),
                geometry.quads()[1].corner(role)
            );
        }
    }

    #[test]
    fn test_six_panels_give_twenty_four_corners() {
        let panels = (0..6)
            .map(|i| panel(Vec3::X * (i as f32 * 2.0), 1.0, Vec2::ZERO, 1.0))
            .collect();
        let geometry = AreaLightGeometry::extract(&mesh(panels)).unwrap();
        assert_eq!(geometry.panel_count(), 6);
        assert_eq!(geometry.corner_positions().len(), 24);
    }

    #[test]
    fn test_malformed_meshes_are_rejected() {
        let empty = MeshBuffer::default();
        assert!(matches!(
            AreaLightGeometry::extract(&empty),
            Err(SeaglowError::MalformedLightMesh(_))
        ));

        let mut corners = panel(Vec3::ZERO, 1.0, Vec2::ZERO, 1.0);
        corners.pop();
        let err = AreaLightGeometry::extract(&mesh(vec![corners])).unwrap_err();
        assert!(matches!(err, SeaglowError::MalformedLightMesh(_)));
        assert!(err.is_fatal());
    }
}
