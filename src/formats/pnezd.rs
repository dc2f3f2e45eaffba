//! PNEZD coordinate lists
//!
//! One point per line: `name,northing,easting,elevation,description`.
//! Northing comes before easting. Lines starting with `#` and blank lines
//! are ignored on input; no header or trailer is written on output.
//!
//! Output is plain unless a field holds a comma or a double quote. Such a
//! field is written in CSV double quotes (`"curb, gutter"`) so the line
//! still splits into five fields; every other line is byte for byte
//! `name,N,E,Z,desc`. Line breaks inside a field are written as spaces.
//! On input a quoted field never extends past its own line, and a line
//! whose quotes do not pair up is read literally.

use crate::error::{Error, Result};
use crate::formats::DEFAULT_DESCRIPTION;
use crate::projection::{Coordinate, Geodesy, Srs, Transformer};
use crate::types::{PointRecord, Position};
use std::io;

/// Number of fields on every PNEZD line
pub const FIELD_COUNT: usize = 5;

/// First character of a comment line
pub const COMMENT_PREFIX: char = '#';

/// Reads and writes PNEZD lists, reprojecting through a transformer
pub struct PnezdCodec<'a, G> {
    transformer: &'a Transformer<G>,
}

impl<'a, G: Geodesy> PnezdCodec<'a, G> {
    pub fn new(transformer: &'a Transformer<G>) -> Self {
        Self { transformer }
    }

    /// Parses `text` into records still expressed in `source`
    ///
    /// Elevations stay in the source system's unit.
    pub fn parse(&self, text: &str, source: &Srs) -> Result<Vec<PointRecord>> {
        let mut records = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index as u64 + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
                continue;
            }

            let row = split_line(trimmed, line)?;
            if row.len() != FIELD_COUNT {
                return Err(Error::MalformedRecord {
                    line,
                    message: format!("expected {} fields, found {}", FIELD_COUNT, row.len()),
                });
            }

            let name = &row[0];
            let northing = parse_number(&row[1], "northing", line)?;
            let easting = parse_number(&row[2], "easting", line)?;
            let elevation = match &row[3] {
                "" => None,
                text => Some(parse_number(text, "elevation", line)?),
            };

            let coord = Coordinate::from_northing_easting(northing, easting)
                .with_z(elevation.unwrap_or(0.0));
            let mut record = PointRecord::new(name, Position::new(coord, source.clone()));
            record.elevation = elevation;
            record.name_label = Some(name.to_string()).filter(|n| !n.is_empty());
            record.description = Some(row[4].to_string()).filter(|d| !d.is_empty());
            records.push(record);
        }

        tracing::debug!(points = records.len(), srs = %source, "parsed PNEZD list");
        Ok(records)
    }

    /// Decodes `text` written in `source` into WGS84 records, heights in metres
    pub fn decode(&self, text: &str, source: &Srs) -> Result<Vec<PointRecord>> {
        let parsed = self.parse(text, source)?;
        self.transformer.transform_all(&parsed, &Srs::wgs84())
    }

    /// Encodes point records as PNEZD lines in `target`
    ///
    /// Non-point geometries are skipped. Coordinates and elevation are written
    /// with four decimals; a missing elevation leaves its field empty.
    pub fn encode(&self, records: &[PointRecord], target: &Srs) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let mut written = 0usize;
        for record in records {
            if !record.is_point() {
                tracing::warn!(
                    name = %record.name,
                    kind = record.geometry.kind(),
                    "skipping non-point geometry"
                );
                continue;
            }

            let projected = self.transformer
                .transform_record(record, target)
                .map_err(|e| e.at_point(&record.name))?;
            let Some(position) = projected.position() else {
                continue;
            };

            let northing = format!("{:.4}", position.northing());
            let easting = format!("{:.4}", position.easting());
            let elevation = projected.elevation
                .map(|ele| format!("{:.4}", ele))
                .unwrap_or_default();

            let name = single_line(&record.name);
            let description = single_line(record.description_or(DEFAULT_DESCRIPTION));

            writer.write_record([
                name.as_str(),
                northing.as_str(),
                easting.as_str(),
                elevation.as_str(),
                description.as_str(),
            ])
            .map_err(io::Error::from)?;
            written += 1;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;

        tracing::debug!(points = written, srs = %target, "encoded PNEZD list");
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }
}

fn single_line(field: &str) -> String {
    field.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Splits one PNEZD line into its fields
///
/// Quoting only applies when the line's double quotes pair up, so a stray
/// quote in a description stays part of the text.
fn split_line(line: &str, number: u64) -> Result<csv::StringRecord> {
    let quoting = line.bytes().filter(|&b| b == b'"').count() % 2 == 0;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(quoting)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut row = csv::StringRecord::new();
    reader.read_record(&mut row).map_err(|e| Error::MalformedRecord {
        line: number,
        message: e.to_string(),
    })?;
    Ok(row)
}

fn parse_number(text: &str, field: &str, line: u64) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::MalformedRecord {
            line,
            message: format!("invalid {} '{}'", field, text),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::fixture::{state_plane, PlanarGeodesy};
    use crate::projection::units::US_SURVEY_FOOT;

    fn transformer() -> Transformer<PlanarGeodesy> {
        Transformer::new(PlanarGeodesy)
    }

    #[test]
    fn test_northing_precedes_easting() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = codec
            .parse("4501,4555123.4567,1234567.8912,353.4000,SW212", &state_plane())
            .unwrap();

        let position = records[0].position().unwrap();
        assert_eq!(position.northing(), 4555123.4567);
        assert_eq!(position.easting(), 1234567.8912);
        assert_eq!(position.srs, state_plane());
        assert_eq!(records[0].elevation, Some(353.4));
        assert_eq!(records[0].description.as_deref(), Some("SW212"));
        assert_eq!(records[0].name, "4501");
    }

    #[test]
    fn test_decode_yields_wgs84_metres() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = codec
            .decode("4501,2000000.0000,6000000.0000,100.0000,SW212\n", &state_plane())
            .unwrap();

        assert_eq!(records[0].srs(), &Srs::wgs84());
        let expected = 100.0 * US_SURVEY_FOOT;
        assert!((records[0].elevation.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_fields() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let err = codec.parse("4501,4555123.4567", &state_plane()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_too_many_fields() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let text = "1,2,3,4,OK\n2,2,3,4,SW,212\n";
        let err = codec.parse(text, &state_plane()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        assert!(codec.parse("", &state_plane()).unwrap().is_empty());

        let text = "# exported from data collector\r\n\r\n1,2000000,6000000,10,A\r\n   \r\n2,2000010,6000010,11,B\r\n";
        let records = codec.parse(text, &state_plane()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "2");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = codec.parse(" 7 , 2000000.5 , 6000000.25 , 12.5 , MH ", &state_plane()).unwrap();
        assert_eq!(records[0].name, "7");
        assert_eq!(records[0].position().unwrap().northing(), 2000000.5);
        assert_eq!(records[0].description.as_deref(), Some("MH"));
    }

    #[test]
    fn test_empty_optional_fields() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = codec.parse("7,2000000,6000000,,", &state_plane()).unwrap();
        assert_eq!(records[0].elevation, None);
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_bad_number() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let err = codec.parse("7,north,6000000,1,X", &state_plane()).unwrap_err();
        assert!(err.to_string().contains("northing"));
    }

    #[test]
    fn test_encode_line_format() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let record = PointRecord::new("4501", Position::wgs84(-116.25, 32.1666666667, 30.48006096))
            .with_elevation(30.48006096)
            .with_description("SW212");

        let text = codec.encode(&[record], &state_plane()).unwrap();
        let expected_northing = 500_000.0 / US_SURVEY_FOOT;
        let expected_easting = 2_000_000.0 / US_SURVEY_FOOT;
        assert_eq!(
            text,
            format!("4501,{:.4},{:.4},100.0000,SW212\n", expected_northing, expected_easting)
        );
    }

    #[test]
    fn test_encode_fallbacks() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = vec![
            PointRecord::new("1", Position::wgs84(-118.0, 34.0, 0.0)).with_comment("SW212"),
            PointRecord::new("2", Position::wgs84(-118.0, 34.0, 0.0)),
        ];
        let text = codec.encode(&records, &state_plane()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with(",,SW212"));
        assert!(lines[1].ends_with(",,WAYPOINT"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_encode_skips_non_points() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let point = PointRecord::new("1", Position::wgs84(-118.0, 34.0, 0.0));
        let track = PointRecord::line_string(
            "trk",
            vec![Coordinate::new(-118.0, 34.0), Coordinate::new(-118.1, 34.1)],
            Srs::wgs84(),
        );
        let records = vec![point.clone(), track, point.clone(), point];
        let text = codec.encode(&records, &state_plane()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_delimiter_in_description_survives() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let record = PointRecord::new("1", Position::wgs84(-118.0, 34.0, 0.0))
            .with_elevation(1.0)
            .with_description("curb, gutter");

        let text = codec.encode(&[record], &state_plane()).unwrap();
        let back = codec.decode(&text, &state_plane()).unwrap();
        assert_eq!(back[0].description.as_deref(), Some("curb, gutter"));
    }

    #[test]
    fn test_encode_round_trip() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let record = PointRecord::new("4501", Position::wgs84(-117.1, 33.2, 107.7531))
            .with_elevation(107.7531)
            .with_description("SW212");

        let text = codec.encode(&[record], &state_plane()).unwrap();
        let back = codec.decode(&text, &state_plane()).unwrap();
        let position = back[0].position().unwrap();

        assert!((position.longitude() - -117.1).abs() < 1e-6);
        assert!((position.latitude() - 33.2).abs() < 1e-6);
        assert!((back[0].elevation.unwrap() - 107.7531).abs() < 0.001);
        assert_eq!(back[0].name_label.as_deref(), Some("4501"));
    }

    #[test]
    fn test_projection_failure_names_point() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let record = PointRecord::new("BAD", Position::wgs84(0.0, 91.0, 0.0));
        match codec.encode(&[record], &state_plane()).unwrap_err() {
            Error::Projection { point, .. } => assert_eq!(point.as_deref(), Some("BAD")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_stray_quote_stays_on_its_line() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let text = "1,2000000,6000000,1,\"6 IN PIPE\n2,2000100,6000100,2,IP\n3,2000200,6000200,3,MH\n";
        let records = codec.parse(text, &state_plane()).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["1", "2", "3"]);
        assert_eq!(records[0].description.as_deref(), Some("\"6 IN PIPE"));
        assert_eq!(records[2].description.as_deref(), Some("MH"));
    }

    #[test]
    fn test_quoted_field_with_unquoted_quotes() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let text = "1,2000000,6000000,1,\"6\"\" PIPE, CAPPED\"\n2,2000100,6000100,2,8\" PIPE\n";
        let records = codec.parse(text, &state_plane()).unwrap();
        assert_eq!(records[0].description.as_deref(), Some("6\" PIPE, CAPPED"));
        assert_eq!(records[1].description.as_deref(), Some("8\" PIPE"));
    }

    #[test]
    fn test_encode_keeps_one_line_per_point() {
        let transformer = transformer();
        let codec = PnezdCodec::new(&transformer);
        let records = vec![
            PointRecord::new("1", Position::wgs84(-118.0, 34.0, 0.0)).with_description("TOP\r\nOF CURB"),
            PointRecord::new("2", Position::wgs84(-118.0, 34.0, 0.0)).with_description("EP"),
        ];

        let text = codec.encode(&records, &state_plane()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().ends_with(",,TOP OF CURB"));

        let back = codec.parse(&text, &state_plane()).unwrap();
        assert_eq!(back.len(), 2);
    }
}
