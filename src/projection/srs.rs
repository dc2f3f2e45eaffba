use crate::error::Error;
use crate::projection::epsg;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies the spatial reference system a position is expressed in
///
/// Codes are kept as numbers so `EPSG:2229`, `epsg:2229` and `2229` compare
/// equal. Anything else is carried as an opaque PROJ definition and handed to
/// the geodesy backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Srs {
    Epsg(u32),
    Definition(String),
}

impl Srs {
    /// The world geodetic system every decoded record ends up in
    pub fn wgs84() -> Self {
        Srs::Epsg(epsg::WGS84)
    }

    pub fn epsg(code: u32) -> Self {
        Srs::Epsg(code)
    }

    pub fn is_wgs84(&self) -> bool {
        *self == Srs::wgs84()
    }

    /// Returns the EPSG code, if this is an authority code
    pub fn code(&self) -> Option<u32> {
        match self {
            Srs::Epsg(code) => Some(*code),
            Srs::Definition(_) => None,
        }
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Srs::Epsg(code) => write!(f, "EPSG:{}", code),
            Srs::Definition(definition) => f.write_str(definition),
        }
    }
}

impl FromStr for Srs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::ReferenceSystem("empty reference system identifier".to_string()));
        }

        let code = match s.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return Ok(Srs::Definition(s.to_string())),
            None => s,
        };

        if code.chars().all(|c| c.is_ascii_digit()) {
            code.parse()
                .map(Srs::Epsg)
                .map_err(|e| Error::ReferenceSystem(format!("invalid EPSG code '{}': {}", code, e)))
        } else if s.contains(':') {
            Err(Error::ReferenceSystem(format!("invalid EPSG code '{}'", code)))
        } else {
            Ok(Srs::Definition(s.to_string()))
        }
    }
}

impl TryFrom<String> for Srs {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Srs> for String {
    fn from(srs: Srs) -> Self {
        srs.to_string()
    }
}
