//! Waypoint file formats

pub mod gpx;
pub mod pnezd;

pub use gpx::{GpxReader, GpxWriter};
pub use pnezd::PnezdCodec;

/// Text written for comment and description when a record has neither
pub const DEFAULT_DESCRIPTION: &str = "WAYPOINT";
