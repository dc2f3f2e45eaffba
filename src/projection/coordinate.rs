/// A bare x/y/z triple with no reference system attached
///
/// `x` is longitude or easting, `y` is latitude or northing and `z` is the
/// height in the linear unit of whatever system the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    /// Creates a new 2D coordinate (z = 0.0)
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Creates a new 3D coordinate
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a coordinate from longitude/latitude in degrees
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat)
    }

    /// Creates a coordinate from the northing-first ordering used by survey lists
    pub fn from_northing_easting(northing: f64, easting: f64) -> Self {
        Self::new(easting, northing)
    }

    /// Returns a copy with a different height
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
