//! Free-fly camera driven by held keys and mouse drags.

use glam::{Mat4, Vec3};

use crate::input::Movement;
use crate::params::{FreeFlyConfig, RenderConfig};

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementKeys {
    /// Record a press or release; the last event before a frame wins
    pub fn set(&mut self, movement: Movement, held: bool) {
        match movement {
            Movement::Forward => self.forward = held,
            Movement::Backward => self.backward = held,
            Movement::Left => self.left = held,
            Movement::Right => self.right = held,
            Movement::Up => self.up = held,
            Movement::Down => self.down = held,
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Yaw/pitch camera with a derived orthonormal basis
#[derive(Debug, Clone)]
pub struct FreeFlyCamera {
    pub position: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    front: Vec3,
    right: Vec3,
    config: FreeFlyConfig,
}

impl FreeFlyCamera {
    /// Create new camera at the configured start pose
    pub fn new(config: FreeFlyConfig) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            yaw_deg: config.yaw_deg,
            pitch_deg: config
                .pitch_deg
                .clamp(-config.pitch_limit_deg, config.pitch_limit_deg),
            front: Vec3::Z,
            right: Vec3::NEG_X,
            config,
        };
        camera.update_basis();
        camera
    }

    /// Recompute front and right from yaw and pitch
    pub fn update_basis(&mut self) {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
    }

    /// Translate along the basis for every held key
    ///
    /// # Arguments
    /// * `keys` - Held movement keys
    /// * `dt_s` - Elapsed time since the last frame in seconds
    pub fn apply_movement(&mut self, keys: &MovementKeys, dt_s: f32) {
        if !keys.any() {
            return;
        }
        let step = self.config.move_speed * dt_s;
        if keys.forward {
            self.position += self.front * step;
        }
        if keys.backward {
            self.position -= self.front * step;
        }
        if keys.left {
            self.position -= self.right * step;
        }
        if keys.right {
            self.position += self.right * step;
        }
        if keys.up {
            self.position += Vec3::Y * step;
        }
        if keys.down {
            self.position -= Vec3::Y * step;
        }
    }

    /// Left-drag look; pixel deltas in window coordinates (y grows downward)
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let limit = self.config.pitch_limit_deg;
        self.yaw_deg += dx * self.config.mouse_sensitivity_deg;
        self.pitch_deg = (self.pitch_deg - dy * self.config.mouse_sensitivity_deg).clamp(-limit, limit);
        self.update_basis();
    }

    /// Right-drag dolly along the view direction
    pub fn dolly(&mut self, dy: f32) {
        self.position += self.front * dy * self.config.dolly_per_pixel;
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// View-space up vector
    pub fn up(&self) -> Vec3 {
        self.right.cross(self.front).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up())
    }

    pub fn projection_matrix(&self, render_config: &RenderConfig, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect_ratio,
            render_config.near_plane,
            render_config.far_plane,
        )
    }
}

impl Default for FreeFlyCamera {
    fn default() -> Self {
        Self::new(FreeFlyConfig::default())
    }
}
