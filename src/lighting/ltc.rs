//! Precomputed linearly transformed cosine tables.
//!
//! Two 64x64 RGBA float tables indexed by (roughness, view angle):
//! the first holds the inverse transform matrix coefficients, the second
//! the Fresnel terms and the horizon clipping factor.

use std::fs;
use std::path::Path;

use crate::error::{Result, SeaglowError};

/// Table edge length in texels
pub const LTC_TABLE_SIZE: u32 = 64;
/// Floats per texel
pub const LTC_CHANNELS: usize = 4;
/// Total floats in one table
pub const LTC_TABLE_LEN: usize = (LTC_TABLE_SIZE * LTC_TABLE_SIZE) as usize * LTC_CHANNELS;

/// One read-only lookup table, row-major RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct IlluminationTable {
    values: Vec<f32>,
}

impl IlluminationTable {
    /// Take ownership of exactly `LTC_TABLE_LEN` floats
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.len() != LTC_TABLE_LEN {
            return Err(SeaglowError::TableSizeMismatch {
                expected: LTC_TABLE_LEN,
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// Decode little-endian f32 values
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(SeaglowError::TableSizeMismatch {
                expected: LTC_TABLE_LEN,
                actual: bytes.len() / 4,
            });
        }
        let values = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Self::new(values)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| SeaglowError::MissingTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let table = Self::from_le_bytes(&bytes).map_err(|e| {
            log::error!("{}: {}", path.display(), e);
            e
        })?;
        log::info!("Loaded illumination table {}", path.display());
        Ok(table)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// RGBA of the texel at column `x`, row `y`
    #[cfg(test)]
    fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let x = x.min(LTC_TABLE_SIZE - 1) as usize;
        let y = y.min(LTC_TABLE_SIZE - 1) as usize;
        let start = (y * LTC_TABLE_SIZE as usize + x) * LTC_CHANNELS;
        [
            self.values[start],
            self.values[start + 1],
            self.values[start + 2],
            self.values[start + 3],
        ]
    }

    /// Bytes ready for upload as an `Rgba32Float` texture
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }
}

/// The matrix table and the amplitude table, bound together
#[derive(Debug, Clone, PartialEq)]
pub struct IlluminationTables {
    pub matrix: IlluminationTable,
    pub amplitude: IlluminationTable,
}

impl IlluminationTables {
    pub fn new(matrix: Vec<f32>, amplitude: Vec<f32>) -> Result<Self> {
        Ok(Self {
            matrix: IlluminationTable::new(matrix)?,
            amplitude: IlluminationTable::new(amplitude)?,
        })
    }

    /// Load both tables from raw little-endian float files
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(matrix: P, amplitude: Q) -> Result<Self> {
        Ok(Self {
            matrix: IlluminationTable::load(matrix)?,
            amplitude: IlluminationTable::load(amplitude)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_table_len() {
        assert_eq!(LTC_TABLE_LEN, 16384);
    }

    #[test]
    fn test_exact_size_is_accepted() {
        let table = IlluminationTable::new(ramp(LTC_TABLE_LEN)).unwrap();
        assert_eq!(table.values().len(), LTC_TABLE_LEN);
        assert_eq!(table.as_bytes().len(), LTC_TABLE_LEN * 4);
    }

    #[test]
    fn test_one_short_is_rejected() {
        let err = IlluminationTable::new(ramp(LTC_TABLE_LEN - 1)).unwrap_err();
        match err {
            SeaglowError::TableSizeMismatch { expected, actual } => {
                assert_eq!(expected, 16384);
                assert_eq!(actual, 16383);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_one_long_is_rejected() {
        assert!(IlluminationTable::new(ramp(LTC_TABLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_texel_addressing_is_row_major() {
        let table = IlluminationTable::new(ramp(LTC_TABLE_LEN)).unwrap();
        assert_eq!(table.texel(0, 0), [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.texel(1, 0), [4.0, 5.0, 6.0, 7.0]);
        assert_eq!(table.texel(0, 1)[0], 256.0);
        assert_eq!(table.texel(63, 63)[3], (LTC_TABLE_LEN - 1) as f32);
    }

    #[test]
    fn test_le_bytes_decode() {
        let values = ramp(LTC_TABLE_LEN);
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let table = IlluminationTable::from_le_bytes(&bytes).unwrap();
        assert_eq!(table.values(), values.as_slice());

        assert!(matches!(
            IlluminationTable::from_le_bytes(&bytes[..bytes.len() - 1]),
            Err(SeaglowError::TableSizeMismatch { .. })
        ));
        assert!(matches!(
            IlluminationTable::from_le_bytes(&bytes[..bytes.len() - 4]),
            Err(SeaglowError::TableSizeMismatch { actual: 16383, .. })
        ));
    }

    #[test]
    fn test_pair_fails_if_either_table_is_wrong() {
        assert!(IlluminationTables::new(ramp(LTC_TABLE_LEN), ramp(LTC_TABLE_LEN)).is_ok());
        assert!(IlluminationTables::new(ramp(LTC_TABLE_LEN), ramp(12)).is_err());
        assert!(IlluminationTables::new(Vec::new(), ramp(LTC_TABLE_LEN)).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = IlluminationTables::load("no/ltc_1.bin", "no/ltc_2.bin").unwrap_err();
        assert!(matches!(err, SeaglowError::MissingTable { .. }));
        assert!(err.is_fatal());
    }
}
