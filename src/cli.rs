//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{AssetPaths, RenderConfig, WaveConfig};
use crate::scene::SceneSettings;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "seaglow")]
#[command(about = "Tessellated ocean lit by textured area lights", long_about = None)]
pub struct Args {
    /// Surface mesh to tessellate and displace (OBJ with texture coordinates)
    #[arg(value_name = "SURFACE_OBJ")]
    pub surface_mesh: PathBuf,

    /// Area light panels, two triangles per panel (OBJ with texture coordinates)
    #[arg(value_name = "LIGHTS_OBJ")]
    pub light_mesh: PathBuf,

    /// Directory with posx/negx/posy/negy/posz/negz.png sky faces
    #[arg(long, value_name = "DIR", default_value = "skybox_night1")]
    pub skybox: PathBuf,

    /// Emissive image stretched across the light panels
    #[arg(long, value_name = "IMAGE")]
    pub light_texture: Option<PathBuf>,

    /// Inverse-matrix illumination table (raw little-endian f32)
    #[arg(long, value_name = "FILE", default_value = "ltc_1.bin")]
    pub ltc1: PathBuf,

    /// Fresnel/horizon illumination table (raw little-endian f32)
    #[arg(long, value_name = "FILE", default_value = "ltc_2.bin")]
    pub ltc2: PathBuf,

    /// Number of summed waves
    #[arg(long, value_name = "COUNT", default_value_t = 32)]
    pub waves: usize,

    /// Seed for wave directions and speeds (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 800)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 500)]
    pub height: u32,
}

impl Args {
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            surface_mesh: self.surface_mesh.clone(),
            light_mesh: self.light_mesh.clone(),
            skybox_dir: self.skybox.clone(),
            light_texture: self.light_texture.clone(),
            ltc_matrix_table: self.ltc1.clone(),
            ltc_amplitude_table: self.ltc2.clone(),
        }
    }

    pub fn wave_config(&self) -> WaveConfig {
        WaveConfig {
            count: self.waves,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        }
    }

    /// Scene settings with every non-CLI knob at its default
    pub fn scene_settings(&self) -> SceneSettings {
        SceneSettings {
            assets: self.asset_paths(),
            waves: self.wave_config(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_meshes_and_defaults() {
        let args = Args::try_parse_from(["seaglow", "plane.obj", "lights.obj"]).unwrap();
        let assets = args.asset_paths();
        assert_eq!(assets.surface_mesh, PathBuf::from("plane.obj"));
        assert_eq!(assets.light_mesh, PathBuf::from("lights.obj"));
        assert_eq!(assets.skybox_dir, PathBuf::from("skybox_night1"));
        assert!(assets.light_texture.is_none());
        assert_eq!(args.wave_config().count, 32);
        assert_eq!(args.render_config().window_width, 800);
        assert_eq!(args.render_config().window_height, 500);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "seaglow",
            "a.obj",
            "b.obj",
            "--light-texture",
            "panel.png",
            "--waves",
            "8",
            "--seed",
            "42",
            "--width",
            "1280",
            "--ltc2",
            "tables/two.bin",
        ])
        .unwrap();
        let settings = args.scene_settings();
        assert_eq!(settings.waves.count, 8);
        assert_eq!(settings.waves.seed, Some(42));
        assert_eq!(settings.waves.amplitude_ratio, 0.5);
        assert_eq!(
            settings.assets.light_texture,
            Some(PathBuf::from("panel.png"))
        );
        assert_eq!(
            settings.assets.ltc_amplitude_table,
            PathBuf::from("tables/two.bin")
        );
        assert_eq!(args.render_config().window_width, 1280);
    }

    #[test]
    fn test_meshes_are_required() {
        assert!(Args::try_parse_from(["seaglow", "only_one.obj"]).is_err());
    }
}
