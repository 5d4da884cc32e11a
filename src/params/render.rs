//! Rendering configuration and asset locations.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Background shown where no sky cube map is available (linear RGB)
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 500,
            fov_degrees: 40.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            clear_color: [0.4, 0.7, 0.8],
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Sky cube face file names, in cube layer order (+X, -X, +Y, -Y, +Z, -Z)
pub const SKYBOX_FACES: [&str; 6] = [
    "posx.png", "negx.png", "posy.png", "negy.png", "posz.png", "negz.png",
];

/// Where startup assets are read from
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// Surface mesh, tessellated and displaced into the ocean (OBJ)
    pub surface_mesh: PathBuf,

    /// Area light panels, six corners per panel (OBJ)
    pub light_mesh: PathBuf,

    /// Directory holding the six cube faces named in `SKYBOX_FACES`
    pub skybox_dir: PathBuf,

    /// Optional emissive texture mapped across all light panels (RGBA image)
    pub light_texture: Option<PathBuf>,

    /// Inverse-matrix lookup table (raw little-endian f32)
    pub ltc_matrix_table: PathBuf,

    /// Amplitude/fresnel lookup table (raw little-endian f32)
    pub ltc_amplitude_table: PathBuf,
}

impl AssetPaths {
    /// Paths of the six sky faces in cube layer order
    pub fn skybox_faces(&self) -> [PathBuf; 6] {
        SKYBOX_FACES.map(|name| self.skybox_dir.join(name))
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            surface_mesh: PathBuf::from("plane.obj"),
            light_mesh: PathBuf::from("area_lights.obj"),
            skybox_dir: PathBuf::from("skybox_night1"),
            light_texture: None,
            ltc_matrix_table: PathBuf::from("ltc_1.bin"),
            ltc_amplitude_table: PathBuf::from("ltc_2.bin"),
        }
    }
}
