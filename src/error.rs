//! Error types for gpx-pnezd

use std::io;
use thiserror::Error;

/// Result type for gpx-pnezd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting waypoint data
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// GPX document is not well-formed or lacks the expected structure
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A PNEZD line could not be decoded
    #[error("Malformed record on line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    /// A spatial reference system identifier could not be resolved
    #[error("Reference system error: {0}")]
    ReferenceSystem(String),

    /// The geodesy backend could not project a coordinate
    #[error("Projection error{}: {message}", point_suffix(.point))]
    Projection {
        point: Option<String>,
        message: String,
    },

    /// Invalid configuration or command input
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn projection(message: impl Into<String>) -> Self {
        Error::Projection {
            point: None,
            message: message.into(),
        }
    }

    /// Attaches the offending point name to a projection error
    pub(crate) fn at_point(self, name: &str) -> Self {
        match self {
            Error::Projection { point: None, message } => Error::Projection {
                point: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }
}

fn point_suffix(point: &Option<String>) -> String {
    match point {
        Some(name) => format!(" at point '{}'", name),
        None => String::new(),
    }
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Error::MalformedDocument(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Error::MalformedDocument(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Config(error.to_string())
    }
}
