use crate::error::{Error, Result};
use crate::projection::coordinate::Coordinate;
use crate::projection::srs::Srs;
use crate::projection::units::linear_unit_from_projjson;
use proj::Proj;
use std::cell::RefCell;
use std::collections::HashMap;

/// The projection capability the transform engine is built on
///
/// Implementations reproject horizontal coordinates only. Heights are
/// rescaled by the engine from the values returned by `linear_unit`.
pub trait Geodesy {
    /// Checks that the backend can resolve `srs`
    fn resolve(&self, srs: &Srs) -> Result<()>;

    /// Returns the length of one unit of `srs` in metres
    fn linear_unit(&self, srs: &Srs) -> Result<f64>;

    /// Reprojects the x/y of `coord` from `from` into `to`
    ///
    /// Input and output use lon/lat and easting/northing order.
    fn reproject(&self, coord: Coordinate, from: &Srs, to: &Srs) -> Result<Coordinate>;
}

impl<G: Geodesy + ?Sized> Geodesy for &G {
    fn resolve(&self, srs: &Srs) -> Result<()> {
        (**self).resolve(srs)
    }

    fn linear_unit(&self, srs: &Srs) -> Result<f64> {
        (**self).linear_unit(srs)
    }

    fn reproject(&self, coord: Coordinate, from: &Srs, to: &Srs) -> Result<Coordinate> {
        (**self).reproject(coord, from, to)
    }
}

/// Geodesy backed by PROJ
///
/// Pipelines and unit lookups are cached for the lifetime of the value, which
/// is meant to be one conversion run. The cache is not shared across threads.
#[derive(Default)]
pub struct ProjGeodesy {
    pipelines: RefCell<HashMap<(Srs, Srs), Proj>>,
    units: RefCell<HashMap<Srs, f64>>,
}

impl ProjGeodesy {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_crs(srs: &Srs) -> Result<Proj> {
        Proj::new(&srs.to_string())
            .map_err(|e| Error::ReferenceSystem(format!("Failed to resolve {}: {}", srs, e)))
    }
}

impl Geodesy for ProjGeodesy {
    fn resolve(&self, srs: &Srs) -> Result<()> {
        Self::create_crs(srs).map(|_| ())
    }

    fn linear_unit(&self, srs: &Srs) -> Result<f64> {
        if let Some(unit) = self.units.borrow().get(srs) {
            return Ok(*unit);
        }

        let crs = Self::create_crs(srs)?;
        let json = crs
            .to_projjson(None, None, None)
            .map_err(|e| Error::ReferenceSystem(format!("Failed to describe {}: {}", srs, e)))?;
        let unit = linear_unit_from_projjson(&json)?;

        tracing::debug!(srs = %srs, unit, "resolved linear unit");
        self.units.borrow_mut().insert(srs.clone(), unit);
        Ok(unit)
    }

    fn reproject(&self, coord: Coordinate, from: &Srs, to: &Srs) -> Result<Coordinate> {
        let key = (from.clone(), to.clone());
        let mut pipelines = self.pipelines.borrow_mut();

        if !pipelines.contains_key(&key) {
            let proj = Proj::new_known_crs(&from.to_string(), &to.to_string(), None).map_err(|e| {
                Error::ReferenceSystem(format!(
                    "Failed to create projection {} -> {}: {}",
                    from, to, e
                ))
            })?;
            pipelines.insert(key.clone(), proj);
        }

        let proj = pipelines
            .get(&key)
            .ok_or_else(|| Error::projection("projection pipeline missing from cache"))?;

        let (x, y) = proj
            .convert((coord.x, coord.y))
            .map_err(|e| Error::projection(format!("Transformation failed: {}", e)))?;

        if !x.is_finite() || !y.is_finite() {
            return Err(Error::projection(format!(
                "({}, {}) has no finite image in {}",
                coord.x, coord.y, to
            )));
        }

        Ok(Coordinate::new_3d(x, y, coord.z))
    }
}
