//! Area light geometry, lookup tables and shading variants.

pub mod ltc;
pub mod mode;
pub mod quad;

pub use ltc::{IlluminationTable, IlluminationTables, LTC_TABLE_LEN, LTC_TABLE_SIZE};
pub use mode::{KeyLight, LightEmission, ShadingMode};
pub use quad::{
    AreaLightGeometry, CanonicalLightQuad, CornerRole, LightCorner, ReferenceProjectionQuad,
    CORNERS_PER_PANEL,
};
