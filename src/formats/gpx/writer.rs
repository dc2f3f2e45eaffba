use crate::config::Config;
use crate::error::{Error, Result};
use crate::formats::gpx::{GPX_NAMESPACE, GPX_SCHEMA_LOCATION, XSI_NAMESPACE};
use crate::formats::DEFAULT_DESCRIPTION;
use crate::types::PointRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Writes point records as a GPX 1.1 document
#[derive(Debug, Clone)]
pub struct GpxWriter {
    creator: String,
    author_name: String,
    author_link: String,
}

impl GpxWriter {
    pub fn new(
        creator: impl Into<String>,
        author_name: impl Into<String>,
        author_link: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            author_name: author_name.into(),
            author_link: author_link.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.creator, &config.author_name, &config.author_link)
    }

    /// Encodes `records`, stamping the document with the current time
    pub fn encode(&self, records: &[PointRecord]) -> Result<String> {
        self.encode_at(records, Utc::now())
    }

    /// Encodes `records` with an explicit generation time
    ///
    /// Records must already be in WGS84. Non-point geometries are skipped.
    pub fn encode_at(&self, records: &[PointRecord], generated_at: DateTime<Utc>) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let root = BytesStart::new("gpx").with_attributes([
            ("creator", self.creator.as_str()),
            ("version", "1.1"),
            ("xsi:schemaLocation", GPX_SCHEMA_LOCATION),
            ("xmlns", GPX_NAMESPACE),
            ("xmlns:xsi", XSI_NAMESPACE),
        ]);
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Start(BytesStart::new("metadata")))?;
        writer.write_event(Event::Start(
            BytesStart::new("link").with_attributes([("href", self.author_link.as_str())]),
        ))?;
        write_text_element(&mut writer, "text", &self.author_name)?;
        writer.write_event(Event::End(BytesEnd::new("link")))?;
        write_text_element(
            &mut writer,
            "time",
            &generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        writer.write_event(Event::End(BytesEnd::new("metadata")))?;

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
            write_waypoint(&mut writer, record)?;
            written += 1;
        }

        writer.write_event(Event::End(BytesEnd::new("gpx")))?;

        let mut bytes = writer.into_inner();
        bytes.write_all(b"\n")?;

        tracing::debug!(waypoints = written, "encoded GPX document");
        String::from_utf8(bytes)
            .map_err(|e| Error::MalformedDocument(format!("generated document is not UTF-8: {}", e)))
    }
}

impl Default for GpxWriter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn write_waypoint<W: Write>(writer: &mut Writer<W>, record: &PointRecord) -> Result<()> {
    let Some(position) = record.position() else {
        return Ok(());
    };
    if !position.srs.is_wgs84() {
        return Err(Error::ReferenceSystem(format!(
            "waypoint '{}' is in {}, expected WGS84",
            record.name, position.srs
        )));
    }

    let lat = format!("{:.8}", position.latitude());
    let lon = format!("{:.8}", position.longitude());
    writer.write_event(Event::Start(
        BytesStart::new("wpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
    ))?;

    if let Some(ele) = record.elevation {
        write_text_element(writer, "ele", &format!("{:.4}", ele))?;
    }
    if let Some(time) = record.timestamp {
        write_text_element(writer, "time", &time.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
    }
    if let Some(name) = &record.name_label {
        write_text_element(writer, "name", name)?;
    }
    write_text_element(writer, "cmt", record.comment_or(DEFAULT_DESCRIPTION))?;
    write_text_element(writer, "desc", record.description_or(DEFAULT_DESCRIPTION))?;
    if let Some(sym) = &record.symbol {
        write_text_element(writer, "sym", sym)?;
    }
    if let Some(kind) = &record.kind {
        write_text_element(writer, "type", kind)?;
    }

    writer.write_event(Event::End(BytesEnd::new("wpt")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
