//! Spatial reference systems and the transform engine

pub mod coordinate;
pub mod geodesy;
pub mod srs;
pub mod transformer;
pub mod units;

#[cfg(test)]
pub(crate) mod fixture;

pub use coordinate::Coordinate;
pub use geodesy::{Geodesy, ProjGeodesy};
pub use srs::Srs;
pub use transformer::Transformer;

/// Frequently used EPSG codes
pub mod epsg {
    /// WGS 84 geographic, longitude/latitude in degrees
    pub const WGS84: u32 = 4326;
    /// NAD83 / California zone 5 in US survey feet
    pub const CA_STATE_PLANE_V_FT: u32 = 2229;
    /// NAD83 / California zone 5 in metres
    pub const CA_STATE_PLANE_V: u32 = 26945;
}
