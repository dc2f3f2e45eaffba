//! Planar stand-in for PROJ used by unit tests

use crate::error::{Error, Result};
use crate::projection::coordinate::Coordinate;
use crate::projection::epsg;
use crate::projection::geodesy::Geodesy;
use crate::projection::srs::Srs;
use crate::projection::units::US_SURVEY_FOOT;

const ORIGIN_LON: f64 = -116.25;
const ORIGIN_LAT: f64 = 32.1666666667;
const FALSE_EASTING_M: f64 = 2_000_000.0;
const FALSE_NORTHING_M: f64 = 500_000.0;
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Equirectangular projection of WGS84 into a fake State Plane zone in US feet
pub struct PlanarGeodesy;

impl PlanarGeodesy {
    fn check(srs: &Srs) -> Result<()> {
        match srs.code() {
            Some(epsg::WGS84) | Some(epsg::CA_STATE_PLANE_V_FT) => Ok(()),
            _ => Err(Error::ReferenceSystem(format!("unknown reference system {}", srs))),
        }
    }

    fn scale_x() -> f64 {
        METRES_PER_DEGREE * ORIGIN_LAT.to_radians().cos()
    }
}

impl Geodesy for PlanarGeodesy {
    fn resolve(&self, srs: &Srs) -> Result<()> {
        Self::check(srs)
    }

    fn linear_unit(&self, srs: &Srs) -> Result<f64> {
        Self::check(srs)?;
        Ok(if srs.is_wgs84() { 1.0 } else { US_SURVEY_FOOT })
    }

    fn reproject(&self, coord: Coordinate, from: &Srs, to: &Srs) -> Result<Coordinate> {
        Self::check(from)?;
        Self::check(to)?;

        match (from.is_wgs84(), to.is_wgs84()) {
            (true, false) => {
                if coord.y.abs() > 90.0 {
                    return Err(Error::projection(format!("latitude {} out of range", coord.y)));
                }
                let x = ((coord.x - ORIGIN_LON) * Self::scale_x() + FALSE_EASTING_M) / US_SURVEY_FOOT;
                let y = ((coord.y - ORIGIN_LAT) * METRES_PER_DEGREE + FALSE_NORTHING_M) / US_SURVEY_FOOT;
                Ok(Coordinate::new_3d(x, y, coord.z))
            }
            (false, true) => {
                let lon = (coord.x * US_SURVEY_FOOT - FALSE_EASTING_M) / Self::scale_x() + ORIGIN_LON;
                let lat = (coord.y * US_SURVEY_FOOT - FALSE_NORTHING_M) / METRES_PER_DEGREE + ORIGIN_LAT;
                Ok(Coordinate::new_3d(lon, lat, coord.z))
            }
            _ => Ok(coord),
        }
    }
}

pub fn state_plane() -> Srs {
    Srs::epsg(epsg::CA_STATE_PLANE_V_FT)
}
