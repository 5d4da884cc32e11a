//! Procedural wave field parameters.

/// Wave synthesis parameters
#[derive(Debug, Clone)]
pub struct WaveConfig {
    /// Number of summed sine waves (must be >= 1)
    pub count: usize,

    /// Ratio between consecutive wave amplitudes (dimensionless, < 1 for decay)
    pub amplitude_ratio: f32,

    /// Ratio between consecutive wave frequencies (dimensionless, > 1 for detail)
    pub frequency_ratio: f32,

    /// Exclusive upper bound of the integer phase speed (radians per second)
    pub speed_range: u32,

    /// RNG seed for directions and speeds (None = fresh entropy per run)
    pub seed: Option<u64>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            count: 32,
            amplitude_ratio: 0.5,
            frequency_ratio: 1.3,
            speed_range: 10,
            seed: None,
        }
    }
}
