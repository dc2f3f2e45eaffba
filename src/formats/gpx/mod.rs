//! GPX 1.1 waypoint documents
//!
//! Only `wpt` elements are read or written. Tracks, routes and extensions in
//! an input document are skipped.

pub mod reader;
pub mod writer;

pub use reader::GpxReader;
pub use writer::GpxWriter;

/// GPX namespace written on the root element
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Schema location written on the root element
pub const GPX_SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Decodes a GPX document into WGS84 point records
pub fn decode(document: &str) -> crate::Result<Vec<crate::PointRecord>> {
    GpxReader::new().decode(document)
}
