//! Tessellation level-of-detail defaults.

/// Tessellation LOD parameters
#[derive(Debug, Clone)]
pub struct LodConfig {
    /// Starting tessellation level (subdivisions per patch edge)
    pub default_level: u32,

    /// Radius inside which patches get the full level (world units)
    pub default_inner_radius: f32,

    /// Radius beyond which patches drop to level 1 (world units)
    pub default_outer_radius: f32,

    /// Amount both radii move per expand/shrink event (world units)
    pub radius_step: f32,

    /// Highest level the GPU pass will actually subdivide to
    /// 64 = usual hardware tessellator limit
    pub gpu_level_ceiling: u32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            default_level: 1,
            default_inner_radius: 1.0,
            default_outer_radius: 20.0,
            radius_step: 1.0,
            gpu_level_ceiling: 64,
        }
    }
}
