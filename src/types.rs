//! Point record model shared by the codecs and the transform engine

use crate::projection::{Coordinate, Srs};
use chrono::{DateTime, Utc};

/// A coordinate tagged with the reference system it is expressed in
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coord: Coordinate,
    pub srs: Srs,
}

impl Position {
    pub fn new(coord: Coordinate, srs: Srs) -> Self {
        Self { coord, srs }
    }

    /// Creates a WGS84 position from longitude, latitude and height in metres
    pub fn wgs84(lon: f64, lat: f64, height: f64) -> Self {
        Self::new(Coordinate::from_lonlat(lon, lat).with_z(height), Srs::wgs84())
    }

    pub fn longitude(&self) -> f64 {
        self.coord.x
    }

    pub fn latitude(&self) -> f64 {
        self.coord.y
    }

    pub fn easting(&self) -> f64 {
        self.coord.x
    }

    pub fn northing(&self) -> f64 {
        self.coord.y
    }
}

/// Shape of a record
///
/// Only points are written by the codecs. Other shapes may ride along in a
/// record sequence and are dropped at encode time.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString { coords: Vec<Coordinate>, srs: Srs },
}

impl Geometry {
    pub fn srs(&self) -> &Srs {
        match self {
            Geometry::Point(position) => &position.srs,
            Geometry::LineString { srs, .. } => srs,
        }
    }

    /// Upper-case geometry name, as used in WKT
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "POINT",
            Geometry::LineString { .. } => "LINESTRING",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }
}

/// One waypoint or survey point
///
/// `elevation` is in the linear unit of the record's reference system: metres
/// while the record is geographic, the projected system's unit otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Join key between the two formats; the point number in PNEZD
    pub name: String,
    pub geometry: Geometry,
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// The waypoint `<name>` exactly as it appeared, if it did
    pub name_label: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub symbol: Option<String>,
    pub kind: Option<String>,
}

impl PointRecord {
    /// Creates a point record with every optional field absent
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self::with_geometry(name, Geometry::Point(position))
    }

    pub fn line_string(name: impl Into<String>, coords: Vec<Coordinate>, srs: Srs) -> Self {
        Self::with_geometry(name, Geometry::LineString { coords, srs })
    }

    fn with_geometry(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            elevation: None,
            timestamp: None,
            name_label: None,
            description: None,
            comment: None,
            symbol: None,
            kind: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn srs(&self) -> &Srs {
        self.geometry.srs()
    }

    /// Returns the position if this record is a point
    pub fn position(&self) -> Option<&Position> {
        match &self.geometry {
            Geometry::Point(position) => Some(position),
            Geometry::LineString { .. } => None,
        }
    }

    pub fn is_point(&self) -> bool {
        self.geometry.is_point()
    }

    /// Comment text for output: the comment, else the description, else `default`
    pub fn comment_or<'a>(&'a self, default: &'a str) -> &'a str {
        first_present(&[&self.comment, &self.description]).unwrap_or(default)
    }

    /// Description text for output: the description, else the comment, else `default`
    pub fn description_or<'a>(&'a self, default: &'a str) -> &'a str {
        first_present(&[&self.description, &self.comment]).unwrap_or(default)
    }
}

// Empty text counts as absent for output fallbacks
fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| Option::as_deref(*field))
        .find(|text| !text.is_empty())
}
