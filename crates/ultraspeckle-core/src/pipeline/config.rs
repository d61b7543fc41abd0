use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::cleanup::CleanupParams;
use crate::filters::roi::RoiBounds;
use crate::filters::srad::SradParams;

/// Settings for the standard frame chain:
/// normalize -> SRAD -> cleanup -> region selection.
///
/// ```toml
/// [srad]
/// iterations = 300
/// lambda = 0.05
///
/// [cleanup]
/// median_radius = 6
/// log_sigma = 4.0
///
/// [roi]
/// lower = 40
/// upper = 200
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub srad: SradParams,
    /// Median + LoG cleanup; skipped when absent.
    #[serde(default)]
    pub cleanup: Option<CleanupParams>,
    /// Scan-line band to keep; the full frame is kept when absent.
    #[serde(default)]
    pub roi: Option<RoiBounds>,
}

impl PipelineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
