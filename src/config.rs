//! Run configuration

use crate::error::{Error, Result};
use crate::projection::{epsg, Srs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a conversion run
///
/// Every key is optional in the JSON file; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local projected system PNEZD files are read from and written in
    pub target_srs: Srs,
    /// `creator` attribute of generated GPX documents
    pub creator: String,
    /// Author text in the GPX metadata link
    pub author_name: String,
    /// Author URL in the GPX metadata link
    pub author_link: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_srs: Srs::epsg(epsg::CA_STATE_PLANE_V_FT),
            creator: "gpx-pnezd".to_string(),
            author_name: "Charlie Mack".to_string(),
            author_link: "https://cmack.org/".to_string(),
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), srs = %config.target_srs, "loaded configuration");
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn with_target_srs(mut self, srs: Srs) -> Self {
        self.target_srs = srs;
        self
    }
}
