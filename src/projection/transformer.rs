use crate::error::Result;
use crate::projection::coordinate::Coordinate;
use crate::projection::geodesy::Geodesy;
use crate::projection::srs::Srs;
use crate::types::{Geometry, PointRecord, Position};

/// Moves positions and records between spatial reference systems
///
/// Horizontal coordinates are reprojected by the geodesy backend. Heights are
/// never reprojected, only rescaled between the two systems' linear units.
pub struct Transformer<G> {
    geodesy: G,
}

impl<G: Geodesy> Transformer<G> {
    pub fn new(geodesy: G) -> Self {
        Self { geodesy }
    }

    pub fn geodesy(&self) -> &G {
        &self.geodesy
    }

    /// Returns the length of one unit of `srs` in metres
    pub fn linear_unit(&self, srs: &Srs) -> Result<f64> {
        self.geodesy.linear_unit(srs)
    }

    /// Factor that converts a height in `from` units into `to` units
    pub fn height_scale(&self, from: &Srs, to: &Srs) -> Result<f64> {
        if from == to {
            return Ok(1.0);
        }
        Ok(self.linear_unit(from)? / self.linear_unit(to)?)
    }

    /// Transforms a position into `to`
    ///
    /// A position already in `to` is returned unchanged, bit for bit.
    pub fn forward(&self, position: &Position, to: &Srs) -> Result<Position> {
        if position.srs == *to {
            return Ok(position.clone());
        }

        let scale = self.height_scale(&position.srs, to)?;
        let projected = self.geodesy.reproject(position.coord, &position.srs, to)?;

        Ok(Position::new(
            Coordinate::new_3d(projected.x, projected.y, position.coord.z * scale),
            to.clone(),
        ))
    }

    /// Transforms a batch of positions that share one source system
    pub fn forward_many(&self, positions: &[Position], to: &Srs) -> Result<Vec<Position>> {
        positions.iter()
            .map(|position| self.forward(position, to))
            .collect()
    }

    /// Produces a copy of `record` expressed in `to`, elevation rescaled alongside
    ///
    /// The source record is left untouched. Projection failures name the record.
    pub fn transform_record(&self, record: &PointRecord, to: &Srs) -> Result<PointRecord> {
        let from = record.srs();
        if from == to {
            return Ok(record.clone());
        }

        let scale = self.height_scale(from, to)?;
        let geometry = match &record.geometry {
            Geometry::Point(position) => Geometry::Point(self.forward(position, to)?),
            Geometry::LineString { coords, srs } => {
                let positions: Vec<Position> = coords.iter()
                    .map(|coord| Position::new(*coord, srs.clone()))
                    .collect();
                Geometry::LineString {
                    coords: self.forward_many(&positions, to)?
                        .into_iter()
                        .map(|position| position.coord)
                        .collect(),
                    srs: to.clone(),
                }
            }
        };

        Ok(PointRecord {
            geometry,
            elevation: record.elevation.map(|ele| ele * scale),
            ..record.clone()
        })
    }

    /// Transforms every record, stopping at the first failure
    pub fn transform_all(&self, records: &[PointRecord], to: &Srs) -> Result<Vec<PointRecord>> {
        records.iter()
            .map(|record| {
                self.transform_record(record, to)
                    .map_err(|e| e.at_point(&record.name))
            })
            .collect()
    }
}
