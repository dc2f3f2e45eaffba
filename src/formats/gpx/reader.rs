use crate::error::{Error, Result};
use crate::types::{PointRecord, Position};
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Reads the waypoints of a GPX document
#[derive(Debug, Clone, Copy, Default)]
pub struct GpxReader;

impl GpxReader {
    pub fn new() -> Self {
        Self
    }

    /// Decodes every `wpt` element into a WGS84 point record
    ///
    /// Fails if the text is not well-formed XML, if the root element is not
    /// `gpx`, or if a waypoint carries unusable coordinates, height or time.
    pub fn decode(&self, document: &str) -> Result<Vec<PointRecord>> {
        let mut reader = Reader::from_str(document);
        reader.trim_text(true);

        let mut stack: Vec<String> = Vec::new();
        let mut seen_root = false;
        let mut draft: Option<WaypointDraft> = None;
        let mut records = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    if stack.is_empty() {
                        check_root(&name, seen_root)?;
                        seen_root = true;
                    } else if is_waypoint(&stack, &name) {
                        draft = Some(WaypointDraft::from_start(&e)?);
                    } else if let Some(draft) = draft.as_mut().filter(|_| stack.len() == 2) {
                        draft.open_field(&name);
                    }
                    stack.push(name);
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    if stack.is_empty() {
                        check_root(&name, seen_root)?;
                        seen_root = true;
                    } else if is_waypoint(&stack, &name) {
                        let index = records.len() + 1;
                        records.push(WaypointDraft::from_start(&e)?.finish(index)?);
                    } else if let Some(draft) = draft.as_mut().filter(|_| stack.len() == 2) {
                        draft.open_field(&name);
                    }
                }
                Event::Text(text) => {
                    if let Some(draft) = draft.as_mut().filter(|_| stack.len() == 3) {
                        draft.append(&stack[2], &text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(draft) = draft.as_mut().filter(|_| stack.len() == 3) {
                        let text = std::str::from_utf8(&data)
                            .map_err(|e| Error::MalformedDocument(format!("invalid UTF-8 in CDATA: {}", e)))?;
                        draft.append(&stack[2], text);
                    }
                }
                Event::End(_) => {
                    let closed = stack.pop();
                    if stack.len() == 1 && closed.as_deref() == Some("wpt") {
                        if let Some(done) = draft.take() {
                            let index = records.len() + 1;
                            records.push(done.finish(index)?);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(Error::MalformedDocument("missing <gpx> root element".to_string()));
        }
        if let Some(open) = stack.last() {
            return Err(Error::MalformedDocument(format!(
                "document ends inside <{}>",
                open
            )));
        }

        tracing::debug!(waypoints = records.len(), "decoded GPX document");
        Ok(records)
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn check_root(name: &str, seen_root: bool) -> Result<()> {
    if seen_root {
        return Err(Error::MalformedDocument("more than one root element".to_string()));
    }
    if name != "gpx" {
        return Err(Error::MalformedDocument(format!(
            "expected <gpx> root element, found <{}>",
            name
        )));
    }
    Ok(())
}

fn is_waypoint(stack: &[String], name: &str) -> bool {
    stack.len() == 1 && name == "wpt"
}

/// Text collected for one `wpt` element before it is validated
#[derive(Debug, Default)]
struct WaypointDraft {
    lat: Option<String>,
    lon: Option<String>,
    ele: Option<String>,
    time: Option<String>,
    name: Option<String>,
    desc: Option<String>,
    cmt: Option<String>,
    sym: Option<String>,
    kind: Option<String>,
}

impl WaypointDraft {
    fn from_start(e: &BytesStart) -> Result<Self> {
        let mut draft = Self::default();
        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.local_name().as_ref() {
                b"lat" => draft.lat = Some(attr.unescape_value()?.into_owned()),
                b"lon" => draft.lon = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }
        Ok(draft)
    }

    fn field(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "ele" => Some(&mut self.ele),
            "time" => Some(&mut self.time),
            "name" => Some(&mut self.name),
            "desc" => Some(&mut self.desc),
            "cmt" => Some(&mut self.cmt),
            "sym" => Some(&mut self.sym),
            "type" => Some(&mut self.kind),
            _ => None,
        }
    }

    // A child element that is present but empty yields Some("")
    fn open_field(&mut self, name: &str) {
        if let Some(field) = self.field(name) {
            field.get_or_insert_with(String::new);
        }
    }

    fn append(&mut self, name: &str, text: &str) {
        if let Some(field) = self.field(name) {
            field.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn finish(self, index: usize) -> Result<PointRecord> {
        let lat = parse_coordinate("lat", self.lat.as_deref(), index)?;
        let lon = parse_coordinate("lon", self.lon.as_deref(), index)?;

        let elevation = match self.ele.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Some(text.parse::<f64>().map_err(|_| {
                Error::MalformedDocument(format!("waypoint {}: invalid elevation '{}'", index, text))
            })?),
            None => None,
        };

        let timestamp = match self.time.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Some(parse_time(text).ok_or_else(|| {
                Error::MalformedDocument(format!("waypoint {}: invalid time '{}'", index, text))
            })?),
            None => None,
        };

        let name = self.name.clone().unwrap_or_else(|| index.to_string());
        let position = Position::wgs84(lon, lat, elevation.unwrap_or(0.0));

        Ok(PointRecord {
            elevation,
            timestamp,
            name_label: self.name,
            description: self.desc,
            comment: self.cmt,
            symbol: self.sym,
            kind: self.kind,
            ..PointRecord::new(name, position)
        })
    }
}

/// Parses an `xsd:dateTime`; values without a zone are read as UTC
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
}

fn parse_coordinate(attribute: &str, value: Option<&str>, index: usize) -> Result<f64> {
    let value = value.ok_or_else(|| {
        Error::MalformedDocument(format!("waypoint {} has no '{}' attribute", index, attribute))
    })?;

    value.trim().parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Error::MalformedDocument(format!(
                "waypoint {}: invalid '{}' value '{}'",
                index, attribute, value
            ))
        })
}
