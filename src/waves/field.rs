//! Wave parameter synthesis and the simulation clock.

use std::num::NonZeroU32;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::random::{bounded_rand, random_direction};
use crate::error::{Result, SeaglowError};
use crate::params::WaveConfig;

/// One periodic contributor to the surface displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub amplitude: f32,
    pub frequency: f32,
    /// Integer-valued phase speed, stored as float for the GPU
    pub speed: f32,
    /// Unit-length propagation direction in the XZ plane
    pub direction: Vec2,
}

/// Geometric sequence `1, ratio, ratio^2, ...` of `count` terms.
///
/// Built by repeated multiplication so every term is exactly the previous
/// one times `ratio`.
pub fn scaled_sequence(count: usize, ratio: f32) -> Result<Vec<f32>> {
    if count < 1 {
        log::error!("Number of waves must be at least 1, got {}", count);
        return Err(SeaglowError::DegenerateWaveCount(count));
    }

    let mut values = Vec::with_capacity(count);
    values.push(1.0f32);
    for i in 1..count {
        values.push(values[i - 1] * ratio);
    }
    Ok(values)
}

/// Monotonic simulation time, advanced once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    elapsed_s: f32,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one frame's wall-clock delta
    pub fn advance(&mut self, delta: Duration) -> f32 {
        self.elapsed_s += delta.as_secs_f32();
        self.elapsed_s
    }

    pub fn seconds(&self) -> f32 {
        self.elapsed_s
    }
}

/// Immutable wave set plus the clock that animates it
#[derive(Debug, Clone)]
pub struct WaveField {
    waves: Vec<Wave>,
    pub clock: SimulationClock,
}

impl WaveField {
    /// Synthesize `config.count` waves.
    ///
    /// Amplitudes and frequencies are deterministic; directions and speeds
    /// come from `rng`.
    pub fn generate<R: Rng + ?Sized>(config: &WaveConfig, rng: &mut R) -> Result<Self> {
        let amplitudes = scaled_sequence(config.count, config.amplitude_ratio)?;
        let frequencies = scaled_sequence(config.count, config.frequency_ratio)?;
        let speed_range = NonZeroU32::new(config.speed_range).ok_or_else(|| {
            log::error!("Wave speed range must be at least 1");
            SeaglowError::InvalidConfig("wave speed range is 0".to_string())
        })?;

        let waves = amplitudes
            .into_iter()
            .zip(frequencies)
            .map(|(amplitude, frequency)| Wave {
                amplitude,
                frequency,
                direction: random_direction(rng),
                speed: bounded_rand(rng, speed_range) as f32,
            })
            .collect::<Vec<_>>();

        log::info!(
            "Generated {} waves (amplitude ratio {}, frequency ratio {})",
            waves.len(),
            config.amplitude_ratio,
            config.frequency_ratio
        );

        Ok(Self {
            waves,
            clock: SimulationClock::new(),
        })
    }

    /// No waves at all: the surface stays flat while the clock still runs
    pub fn flat() -> Self {
        Self {
            waves: Vec::new(),
            clock: SimulationClock::new(),
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn amplitudes(&self) -> Vec<f32> {
        self.waves.iter().map(|w| w.amplitude).collect()
    }

    pub fn frequencies(&self) -> Vec<f32> {
        self.waves.iter().map(|w| w.frequency).collect()
    }

    pub fn directions(&self) -> Vec<Vec2> {
        self.waves.iter().map(|w| w.direction).collect()
    }

    pub fn speeds(&self) -> Vec<f32> {
        self.waves.iter().map(|w| w.speed).collect()
    }

    /// Height of the summed waves at a world XZ position, matching the
    /// surface shader's displacement
    #[cfg(test)]
    fn height_at(&self, xz: Vec2) -> f32 {
        let t = self.clock.seconds();
        self.waves
            .iter()
            .map(|w| w.amplitude * (w.frequency * w.direction.dot(xz) + w.speed * t).sin())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scaled_sequence_is_geometric() {
        let values = scaled_sequence(32, 0.5).unwrap();
        assert_eq!(values.len(), 32);
        assert_eq!(values[0], 1.0);
        for i in 1..values.len() {
            assert_eq!(values[i], values[i - 1] * 0.5);
        }
    }

    #[test]
    fn test_single_wave_sequence() {
        assert_eq!(scaled_sequence(1, 1.3).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_zero_waves_is_rejected() {
        let err = scaled_sequence(0, 0.5).unwrap_err();
        assert!(matches!(err, SeaglowError::DegenerateWaveCount(0)));

        let config = WaveConfig {
            count: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(WaveField::generate(&config, &mut rng).is_err());
    }

    #[test]
    fn test_generated_waves_satisfy_invariants() {
        let config = WaveConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let field = WaveField::generate(&config, &mut rng).unwrap();
        assert_eq!(field.len(), 32);

        let amplitudes = field.amplitudes();
        let frequencies = field.frequencies();
        assert_eq!(amplitudes[0], 1.0);
        assert_eq!(frequencies[0], 1.0);
        for i in 1..field.len() {
            assert_eq!(amplitudes[i], amplitudes[i - 1] * config.amplitude_ratio);
            assert_eq!(frequencies[i], frequencies[i - 1] * config.frequency_ratio);
        }

        for wave in field.waves() {
            assert!((wave.direction.length() - 1.0).abs() < 1e-5);
            assert_ne!(wave.direction, Vec2::ZERO);
            assert_eq!(wave.speed.fract(), 0.0);
            assert!((0.0..10.0).contains(&wave.speed));
        }
    }

    #[test]
    fn test_regeneration_is_deterministic_where_it_should_be() {
        let config = WaveConfig::default();
        let first = WaveField::generate(&config, &mut StdRng::seed_from_u64(100)).unwrap();
        let second = WaveField::generate(&config, &mut StdRng::seed_from_u64(200)).unwrap();

        assert_eq!(first.amplitudes(), second.amplitudes());
        assert_eq!(first.frequencies(), second.frequencies());
        assert_ne!(first.directions(), second.directions());
        assert_ne!(first.speeds(), second.speeds());
    }

    #[test]
    fn test_clock_only_moves_forward() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.seconds(), 0.0);
        clock.advance(Duration::from_millis(250));
        let t = clock.advance(Duration::from_millis(250));
        assert!((t - 0.5).abs() < 1e-6);
        clock.advance(Duration::ZERO);
        assert!((clock.seconds() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_flat_field_has_no_height() {
        let mut field = WaveField::flat();
        assert!(field.is_empty());
        field.clock.advance(Duration::from_secs(2));
        assert_eq!(field.clock.seconds(), 2.0);
        assert_eq!(field.height_at(Vec2::new(3.0, -4.0)), 0.0);
    }

    #[test]
    fn test_height_is_bounded_by_amplitude_sum() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = WaveField::generate(&WaveConfig::default(), &mut rng).unwrap();
        field.clock.advance(Duration::from_secs(3));
        let bound: f32 = field.amplitudes().iter().sum();
        for i in 0..50 {
            let p = Vec2::new(i as f32 * 0.37, i as f32 * -1.1);
            assert!(field.height_at(p).abs() <= bound + 1e-4);
        }
    }
}
