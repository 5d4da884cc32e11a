//! Free-fly camera configuration.

/// Free-fly camera parameters
#[derive(Debug, Clone)]
pub struct FreeFlyConfig {
    /// Starting position (world units)
    pub position: [f32; 3],

    /// Starting horizontal angle (degrees, 90 = looking down +Z)
    pub yaw_deg: f32,

    /// Starting vertical angle (degrees)
    pub pitch_deg: f32,

    /// Held-key translation speed (world units per second)
    pub move_speed: f32,

    /// Left-drag rotation (degrees per pixel)
    pub mouse_sensitivity_deg: f32,

    /// Pitch clamp (degrees, keeps the basis away from the poles)
    pub pitch_limit_deg: f32,

    /// Right-drag dolly along the view direction (world units per pixel)
    pub dolly_per_pixel: f32,
}

impl Default for FreeFlyConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            yaw_deg: 90.0,
            pitch_deg: 0.0,
            move_speed: 10.0,
            mouse_sensitivity_deg: 0.5,
            pitch_limit_deg: 89.0,
            dolly_per_pixel: 0.1,
        }
    }
}
