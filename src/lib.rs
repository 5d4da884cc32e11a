//! Seaglow library - tessellated ocean lit by textured area lights

pub mod camera;
pub mod cli;
pub mod error;
pub mod input;
pub mod lighting;
pub mod lod;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod waves;

pub use error::{Result, SeaglowError};
