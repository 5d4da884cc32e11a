//! Key light and area light shading constants.

/// Lighting parameters streamed to the surface shader
#[derive(Debug, Clone)]
pub struct LightingConfig {
    /// Direction the directional key light travels (world space, normalized on use)
    pub key_direction: [f32; 3],

    /// Position of the key light when it is positional (world units)
    pub key_position: [f32; 3],

    /// Key light colour (linear RGB)
    pub key_color: [f32; 3],

    /// Specular exponent of the water (dimensionless)
    pub shininess: f32,

    /// Key light intensity multiplier
    pub intensity: f32,

    /// Ambient term (fraction of key light colour)
    pub ambient: f32,

    /// Surface roughness used to index the illumination tables, in [0, 1]
    pub roughness: f32,

    /// Emitted colour of the area light panels (linear RGB)
    pub area_color: [f32; 3],

    /// Area light intensity multiplier
    pub area_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            key_direction: [0.0, 0.0, -1.0],
            key_position: [0.0, 10.0, 10.0],
            key_color: [1.0, 1.0, 1.0],
            shininess: 256.0,
            intensity: 1.0,
            ambient: 0.5,
            roughness: 0.25,
            area_color: [1.0, 0.95, 0.85],
            area_intensity: 4.0,
        }
    }
}
