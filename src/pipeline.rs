//! Whole-document conversion between GPX and PNEZD

use crate::config::Config;
use crate::error::{Error, Result};
use crate::formats::{GpxReader, GpxWriter, PnezdCodec};
use crate::projection::{Geodesy, ProjGeodesy, Srs, Transformer};
use crate::types::PointRecord;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A transform step that leaves the records as decoded
pub type NoTransform = fn(Vec<PointRecord>) -> Result<Vec<PointRecord>>;

/// Threads one record sequence through decode, an optional transform and encode
///
/// Each stage sees the complete output of the previous one. The first error
/// ends the run and nothing is encoded.
pub fn run<D, T, E>(input: &str, decode: D, transform: Option<T>, encode: E) -> Result<String>
where
    D: FnOnce(&str) -> Result<Vec<PointRecord>>,
    T: FnOnce(Vec<PointRecord>) -> Result<Vec<PointRecord>>,
    E: FnOnce(&[PointRecord]) -> Result<String>,
{
    let decoded = decode(input)?;
    tracing::debug!(records = decoded.len(), "decoded");

    let records = match transform {
        Some(transform) => {
            let transformed = transform(decoded)?;
            tracing::debug!(records = transformed.len(), "transformed");
            transformed
        }
        None => decoded,
    };

    encode(&records)
}

/// Which way a conversion runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    GpxToPnezd,
    PnezdToGpx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::GpxToPnezd => f.write_str("gpx-to-pnezd"),
            Direction::PnezdToGpx => f.write_str("pnezd-to-gpx"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gpx-to-pnezd" | "to-pnezd" => Ok(Direction::GpxToPnezd),
            "pnezd-to-gpx" | "to-gpx" => Ok(Direction::PnezdToGpx),
            other => Err(Error::Config(format!("unknown direction '{}'", other))),
        }
    }
}

/// Binds the codecs and the transform engine for one or more runs
pub struct Converter<G> {
    transformer: Transformer<G>,
    reader: GpxReader,
    writer: GpxWriter,
}

impl Converter<ProjGeodesy> {
    /// Creates a converter backed by PROJ
    pub fn with_proj(config: &Config) -> Self {
        Self::new(ProjGeodesy::new(), GpxWriter::from_config(config))
    }
}

impl<G: Geodesy> Converter<G> {
    pub fn new(geodesy: G, writer: GpxWriter) -> Self {
        Self {
            transformer: Transformer::new(geodesy),
            reader: GpxReader::new(),
            writer,
        }
    }

    pub fn transformer(&self) -> &Transformer<G> {
        &self.transformer
    }

    /// Converts a GPX document into a PNEZD list in `target`
    pub fn gpx_to_pnezd(&self, document: &str, target: &Srs) -> Result<String> {
        self.transformer.geodesy().resolve(target)?;
        let codec = PnezdCodec::new(&self.transformer);

        run(
            document,
            |doc| self.reader.decode(doc),
            Some(|records: Vec<PointRecord>| self.transformer.transform_all(&records, target)),
            |records| codec.encode(records, target),
        )
    }

    /// Converts a PNEZD list written in `source` into a GPX document
    pub fn pnezd_to_gpx(&self, text: &str, source: &Srs) -> Result<String> {
        self.transformer.geodesy().resolve(source)?;
        let codec = PnezdCodec::new(&self.transformer);

        run(
            text,
            |text| codec.decode(text, source),
            None::<NoTransform>,
            |records| self.writer.encode(records),
        )
    }

    /// Runs one conversion; `srs` is the PNEZD side's reference system
    pub fn convert(&self, direction: Direction, input: &str, srs: &Srs) -> Result<String> {
        let output = match direction {
            Direction::GpxToPnezd => self.gpx_to_pnezd(input, srs)?,
            Direction::PnezdToGpx => self.pnezd_to_gpx(input, srs)?,
        };
        tracing::info!(%direction, srs = %srs, bytes = output.len(), "conversion complete");
        Ok(output)
    }

    /// Converts `input` into `output`
    ///
    /// The output file is only written once the whole conversion has succeeded.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        direction: Direction,
        input: P,
        output: Q,
        srs: &Srs,
    ) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        let text = fs::read_to_string(input)?;
        let converted = self.convert(direction, &text, srs)?;
        fs::write(output, converted)?;

        tracing::info!(input = %input.display(), output = %output.display(), "wrote output");
        Ok(())
    }
}
