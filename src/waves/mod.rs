//! Procedural multi-wave displacement model.
//!
//! Parameters are generated once at startup and streamed to the surface
//! shader every frame; only the simulation clock changes afterwards.

mod field;
mod random;

// Re-export public types
pub use field::{scaled_sequence, SimulationClock, Wave, WaveField};
pub use random::{bounded_rand, random_direction};
