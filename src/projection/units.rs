//! Linear unit lookup from PROJJSON descriptions

use crate::error::{Error, Result};
use serde::Deserialize;

/// Metres per international foot
pub const FOOT: f64 = 0.3048;

/// Metres per US survey foot
pub const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;

#[derive(Debug, Deserialize)]
struct CrsJson {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    coordinate_system: Option<CoordinateSystemJson>,
    /// Set on a `BoundCRS`
    #[serde(default)]
    source_crs: Option<Box<CrsJson>>,
    /// Set on a `CompoundCRS`, horizontal component first
    #[serde(default)]
    components: Vec<CrsJson>,
}

impl CrsJson {
    /// Walks bound and compound wrappers down to the horizontal axes
    fn horizontal_axes(self) -> Result<CoordinateSystemJson> {
        if let Some(cs) = self.coordinate_system {
            return Ok(cs);
        }
        if let Some(source) = self.source_crs {
            return (*source).horizontal_axes();
        }
        let kind = self.kind.unwrap_or_else(|| "untyped object".to_string());
        match self.components.into_iter().next() {
            Some(horizontal) => horizontal.horizontal_axes(),
            None => Err(Error::ReferenceSystem(format!("{} has no coordinate axes", kind))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CoordinateSystemJson {
    #[serde(default)]
    axis: Vec<AxisJson>,
}

#[derive(Debug, Deserialize)]
struct AxisJson {
    #[serde(default)]
    unit: Option<UnitJson>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UnitJson {
    Named(String),
    Defined {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        name: String,
        #[serde(default)]
        conversion_factor: Option<f64>,
    },
}

/// Returns metres per unit for a well-known unit name
pub fn named_unit(name: &str) -> Option<f64> {
    match name.to_ascii_lowercase().as_str() {
        "metre" | "meter" | "m" => Some(1.0),
        "foot" | "ft" | "international foot" => Some(FOOT),
        "us survey foot" | "us-ft" | "foot_us" => Some(US_SURVEY_FOOT),
        "kilometre" | "kilometer" | "km" => Some(1000.0),
        _ => None,
    }
}

fn is_angular(name: &str, kind: Option<&str>) -> bool {
    matches!(kind, Some("AngularUnit"))
        || matches!(
            name.to_ascii_lowercase().as_str(),
            "degree" | "radian" | "grad" | "arc-second" | "arc-minute"
        )
}

/// Extracts the length of one horizontal axis unit, in metres, from a PROJJSON CRS
///
/// Geographic systems report 1.0, so heights attached to them are read as metres.
pub fn linear_unit_from_projjson(json: &str) -> Result<f64> {
    let crs: CrsJson = serde_json::from_str(json)
        .map_err(|e| Error::ReferenceSystem(format!("unreadable PROJJSON: {}", e)))?;

    let axis = crs
        .horizontal_axes()?
        .axis
        .into_iter()
        .next()
        .ok_or_else(|| Error::ReferenceSystem("coordinate system has no axes".to_string()))?;

    // An axis without a unit is in metres
    match axis.unit {
        None => Ok(1.0),
        Some(UnitJson::Named(name)) => {
            if is_angular(&name, None) {
                return Ok(1.0);
            }
            named_unit(&name)
                .ok_or_else(|| Error::ReferenceSystem(format!("unknown linear unit '{}'", name)))
        }
        Some(UnitJson::Defined { kind, name, conversion_factor }) => {
            if is_angular(&name, kind.as_deref()) {
                return Ok(1.0);
            }
            conversion_factor
                .or_else(|| named_unit(&name))
                .ok_or_else(|| Error::ReferenceSystem(format!("unknown linear unit '{}'", name)))
        }
    }
}
