//! Distance-adaptive tessellation density state.
//!
//! The controller only holds the knobs; the surface shader turns them into
//! per-patch subdivision. Every transition returns the new state so the
//! caller can push it to the shading stages before the next frame.

use crate::params::LodConfig;

/// Tessellation level and the distance band it fades across
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodState {
    /// Subdivisions per patch edge inside `inner_radius` (>= 1)
    pub tessellation_level: u32,
    /// Full density up to this camera distance (>= 1.0)
    pub inner_radius: f32,
    /// Density reaches level 1 at this camera distance (>= inner_radius)
    pub outer_radius: f32,
}

/// Discrete, user-driven LOD state machine
#[derive(Debug, Clone)]
pub struct TessellationLodController {
    state: LodState,
    config: LodConfig,
}

impl TessellationLodController {
    pub fn new(config: LodConfig) -> Self {
        let state = Self::default_state(&config);
        Self { state, config }
    }

    /// Start from an explicit state; radii below the floor snap to defaults
    pub fn with_state(config: LodConfig, state: LodState) -> Self {
        let mut controller = Self { state, config };
        controller.state.tessellation_level = controller.state.tessellation_level.max(1);
        if controller.state.inner_radius < controller.config.default_inner_radius
            || controller.state.outer_radius < controller.state.inner_radius
        {
            controller.reset_radii();
        }
        controller
    }

    fn default_state(config: &LodConfig) -> LodState {
        LodState {
            tessellation_level: config.default_level.max(1),
            inner_radius: config.default_inner_radius,
            outer_radius: config.default_outer_radius,
        }
    }

    pub fn state(&self) -> LodState {
        self.state
    }

    /// Level the GPU pass subdivides to this frame
    pub fn gpu_level(&self) -> u32 {
        self.state
            .tessellation_level
            .min(self.config.gpu_level_ceiling.max(1))
    }

    pub fn increase_level(&mut self) -> LodState {
        self.state.tessellation_level = self.state.tessellation_level.saturating_add(1);
        log::debug!("Tessellation level {}", self.state.tessellation_level);
        self.state
    }

    pub fn decrease_level(&mut self) -> LodState {
        self.state.tessellation_level = self.state.tessellation_level.saturating_sub(1).max(1);
        log::debug!("Tessellation level {}", self.state.tessellation_level);
        self.state
    }

    pub fn expand_radii(&mut self) -> LodState {
        self.state.inner_radius += self.config.radius_step;
        self.state.outer_radius += self.config.radius_step;
        log::debug!(
            "LOD radii {} / {}",
            self.state.inner_radius,
            self.state.outer_radius
        );
        self.state
    }

    /// Pull both radii in by one step. Falling under the inner floor snaps
    /// the pair back to the defaults instead.
    pub fn shrink_radii(&mut self) -> LodState {
        let floor = self.config.default_inner_radius;
        if self.state.inner_radius > floor {
            self.state.inner_radius -= self.config.radius_step;
            self.state.outer_radius -= self.config.radius_step;
        }
        if self.state.inner_radius < floor {
            self.reset_radii();
        }
        log::debug!(
            "LOD radii {} / {}",
            self.state.inner_radius,
            self.state.outer_radius
        );
        self.state
    }

    fn reset_radii(&mut self) {
        self.state.inner_radius = self.config.default_inner_radius;
        self.state.outer_radius = self.config.default_outer_radius;
    }
}

impl Default for TessellationLodController {
    fn default() -> Self {
        Self::new(LodConfig::default())
    }
}
