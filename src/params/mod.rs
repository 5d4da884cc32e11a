//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (world units, seconds, degrees, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod camera;
mod lighting;
mod lod;
mod render;
mod waves;

// Re-export all types
pub use camera::FreeFlyConfig;
pub use lighting::LightingConfig;
pub use lod::LodConfig;
pub use render::{AssetPaths, RenderConfig};
pub use waves::WaveConfig;
