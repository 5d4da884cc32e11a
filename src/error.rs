//! Crate-wide error type.

use std::path::PathBuf;

/// Errors raised while loading assets or setting up the shading pipeline
#[derive(thiserror::Error, Debug)]
pub enum SeaglowError {
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    #[error("malformed light mesh: {0}")]
    MalformedLightMesh(String),

    #[error("illumination table has {actual} values, expected {expected}")]
    TableSizeMismatch { expected: usize, actual: usize },

    #[error("illumination table {path} unreadable: {reason}")]
    MissingTable { path: PathBuf, reason: String },

    #[error("wave count must be at least 1, got {0}")]
    DegenerateWaveCount(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeaglowError {
    pub fn asset<P: Into<PathBuf>, T: ToString>(path: P, reason: T) -> Self {
        SeaglowError::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn gpu<T: ToString>(msg: T) -> Self {
        SeaglowError::Gpu(msg.to_string())
    }

    /// Whether startup must stop. Everything else disables one feature and
    /// keeps the frame loop alive. The shading pipeline has no fallback for
    /// the illumination tables, so both table failures are fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SeaglowError::MalformedLightMesh(_)
                | SeaglowError::TableSizeMismatch { .. }
                | SeaglowError::MissingTable { .. }
                | SeaglowError::Gpu(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SeaglowError>;
