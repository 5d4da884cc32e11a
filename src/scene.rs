//! Owned per-frame scene state.
//!
//! Everything the frame loop mutates lives here and is passed by reference
//! to whoever reads it. Nothing in here is shared across threads.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{FreeFlyCamera, MovementKeys};
use crate::error::Result;
use crate::input::{Command, Movement};
use crate::lighting::{AreaLightGeometry, IlluminationTables, ShadingMode};
use crate::lod::TessellationLodController;
use crate::mesh::MeshBuffer;
use crate::params::{AssetPaths, FreeFlyConfig, LightingConfig, LodConfig, WaveConfig};
use crate::waves::WaveField;

/// Startup configuration for building a scene
#[derive(Debug, Clone, Default)]
pub struct SceneSettings {
    pub assets: AssetPaths,
    pub waves: WaveConfig,
    pub lod: LodConfig,
    pub camera: FreeFlyConfig,
    pub lighting: LightingConfig,
}

/// Area light panels: the mesh drawn as emitters and the quads derived from it
#[derive(Debug, Clone)]
pub struct LightRig {
    pub mesh: MeshBuffer,
    pub geometry: AreaLightGeometry,
}

impl LightRig {
    pub fn new(mesh: MeshBuffer) -> Result<Self> {
        let geometry = AreaLightGeometry::extract(&mesh)?;
        Ok(Self { mesh, geometry })
    }
}

/// Optional render features, known once the GPU side is up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSupport {
    pub light_texture: bool,
    pub wireframe: bool,
}

/// Mouse buttons that drive the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    /// Yaw and pitch
    Look,
    /// Move along the view direction
    Dolly,
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    look: bool,
    dolly: bool,
    last_cursor: Option<(f64, f64)>,
}

/// All mutable state owned by the frame loop
#[derive(Debug, Clone)]
pub struct SceneState {
    pub camera: FreeFlyCamera,
    pub movement: MovementKeys,
    pub waves: WaveField,
    pub lod: TessellationLodController,
    pub surface: Option<MeshBuffer>,
    pub lights: Option<LightRig>,
    pub tables: IlluminationTables,
    pub shading: ShadingMode,
    pub show_wireframe: bool,
    pub lighting: LightingConfig,
    features: FeatureSupport,
    drag: DragState,
}

impl SceneState {
    /// Assemble a scene from already-loaded parts
    pub fn new(
        settings: &SceneSettings,
        waves: WaveField,
        surface: Option<MeshBuffer>,
        lights: Option<LightRig>,
        tables: IlluminationTables,
    ) -> Self {
        Self {
            camera: FreeFlyCamera::new(settings.camera.clone()),
            movement: MovementKeys::default(),
            waves,
            lod: TessellationLodController::new(settings.lod.clone()),
            surface,
            lights,
            tables,
            shading: ShadingMode::default(),
            show_wireframe: false,
            lighting: settings.lighting.clone(),
            features: FeatureSupport::default(),
            drag: DragState::default(),
        }
    }

    /// Load every startup asset the CPU side needs.
    ///
    /// Non-fatal failures disable one subsystem: a missing surface or light
    /// mesh, or a wave configuration that yields no waves (the surface stays
    /// flat). Fatal ones, a malformed light mesh or unusable illumination
    /// tables, abort startup.
    pub fn load(settings: &SceneSettings) -> Result<Self> {
        let mut rng = match settings.waves.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let waves = recover(WaveField::generate(&settings.waves, &mut rng), "waves")?
            .unwrap_or_else(WaveField::flat);

        let surface = recover(MeshBuffer::load(&settings.assets.surface_mesh), "ocean")?
            .filter(|mesh| {
                if mesh.is_empty() {
                    log::error!("Surface mesh has no triangles, ocean disabled");
                }
                !mesh.is_empty()
            });

        let lights = recover(
            MeshBuffer::load(&settings.assets.light_mesh).and_then(LightRig::new),
            "area lights",
        )?;

        // Every table failure is fatal, there is no shading without them
        let tables = IlluminationTables::load(
            &settings.assets.ltc_matrix_table,
            &settings.assets.ltc_amplitude_table,
        )
        .map_err(|e| {
            log::error!("{}", e);
            e
        })?;

        Ok(Self::new(settings, waves, surface, lights, tables))
    }

    /// Record which optional GPU features made it through startup
    pub fn set_features(&mut self, features: FeatureSupport) {
        self.features = features;
        if !features.wireframe {
            self.show_wireframe = false;
        }
    }

    pub fn features(&self) -> FeatureSupport {
        self.features
    }

    /// Frame steps before drawing: camera basis, held-key movement, clock.
    /// Returns the simulation time to shade with.
    pub fn update(&mut self, dt: Duration) -> f32 {
        self.camera.update_basis();
        self.camera.apply_movement(&self.movement, dt.as_secs_f32());
        self.waves.clock.advance(dt)
    }

    /// Apply a scene command. Window-level commands (fullscreen, exit) are
    /// not handled here and return false.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::ToggleWireframe => {
                if !self.features.wireframe {
                    log::warn!("Wireframe overlay is not supported by this adapter");
                    return false;
                }
                self.show_wireframe = !self.show_wireframe;
                log::info!("Wireframe overlay {}", on_off(self.show_wireframe));
            }
            Command::ToggleLightTexture => {
                return self.shading.toggle_emission(self.features.light_texture);
            }
            Command::ToggleKeyLight => self.shading.toggle_key_light(),
            Command::IncreaseLevel => {
                self.lod.increase_level();
            }
            Command::DecreaseLevel => {
                self.lod.decrease_level();
            }
            Command::ExpandRadii => {
                self.lod.expand_radii();
            }
            Command::ShrinkRadii => {
                self.lod.shrink_radii();
            }
            Command::ToggleFullscreen | Command::Exit => return false,
        }
        true
    }

    pub fn set_movement(&mut self, movement: Movement, held: bool) {
        self.movement.set(movement, held);
    }

    pub fn set_drag(&mut self, button: DragButton, pressed: bool) {
        match button {
            DragButton::Look => self.drag.look = pressed,
            DragButton::Dolly => self.drag.dolly = pressed,
        }
    }

    /// Feed a cursor position; drags act on the delta from the last one
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.drag.last_cursor {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;
            if self.drag.look {
                self.camera.rotate(dx, dy);
            } else if self.drag.dolly {
                self.camera.dolly(dy);
            }
        }
        self.drag.last_cursor = Some((x, y));
    }

    /// Drop held keys and drags, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.movement.clear();
        self.drag = DragState {
            last_cursor: self.drag.last_cursor,
            ..Default::default()
        };
    }

    /// Number of panels the illumination stage should integrate over
    pub fn light_panel_count(&self) -> usize {
        self.lights
            .as_ref()
            .map_or(0, |rig| rig.geometry.panel_count())
    }
}

/// Keep startup going past a failure that only costs one feature; fatal
/// failures are passed back to the caller
fn recover<T>(result: Result<T>, feature: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => {
            log::error!("{}", e);
            Err(e)
        }
        Err(e) => {
            log::error!("{}; {} disabled", e, feature);
            Ok(None)
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
