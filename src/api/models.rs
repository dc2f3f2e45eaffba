use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Fields collected from a multipart conversion upload
#[derive(Debug, Default)]
pub struct ConversionUpload {
    pub file: Option<String>,
    pub srs: Option<String>,
}
