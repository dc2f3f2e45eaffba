//! gpx-pnezd - Convert GPS waypoints to survey coordinate lists and back
//!
//! Waypoints captured on a handheld GPS arrive as GPX (WGS84 latitude and
//! longitude, heights in metres). Survey software wants PNEZD lists
//! (`point,northing,easting,elevation,description`) in a local projected
//! system such as a State Plane zone in US survey feet. This crate decodes
//! either format into [`PointRecord`]s, moves them between reference systems
//! with a [`Transformer`] backed by PROJ, and encodes the other format.
//!
//! # Examples
//!
//! ## GPX to PNEZD
//!
//! ```no_run
//! use gpx_pnezd::{Config, Converter, Srs};
//!
//! let config = Config::default();
//! let converter = Converter::with_proj(&config);
//!
//! let gpx = std::fs::read_to_string("gpsmap.gpx")?;
//! let pnezd = converter.gpx_to_pnezd(&gpx, &Srs::epsg(2229))?;
//! print!("{}", pnezd);
//! # Ok::<(), gpx_pnezd::Error>(())
//! ```
//!
//! ## Working with records directly
//!
//! ```no_run
//! use gpx_pnezd::{formats::gpx, ProjGeodesy, Srs, Transformer};
//!
//! let records = gpx::decode(&std::fs::read_to_string("gpsmap.gpx")?)?;
//! let transformer = Transformer::new(ProjGeodesy::new());
//!
//! for record in transformer.transform_all(&records, &Srs::epsg(2229))? {
//!     if let Some(position) = record.position() {
//!         println!("{}: N {:.4} E {:.4}", record.name, position.northing(), position.easting());
//!     }
//! }
//! # Ok::<(), gpx_pnezd::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod formats;
pub mod pipeline;
pub mod projection;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use formats::{GpxReader, GpxWriter, PnezdCodec};
pub use pipeline::{Converter, Direction};
pub use projection::{Coordinate, Geodesy, ProjGeodesy, Srs, Transformer};
pub use types::{Geometry, PointRecord, Position};
