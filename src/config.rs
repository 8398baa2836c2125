//! Configuration for bitgrid-compress

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::CompressionMethod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Method used by `BitGrid::save_default`.
    pub default_method: CompressionMethod,
    /// How far back the dictionary coder searches for matches, in bytes.
    pub dict_window: usize,
    pub dict_min_match: usize,
    /// Escape literal 0xFF bytes in dictionary output. Disable only to write
    /// streams readable by decoders that predate the escape token.
    pub dict_escape_marker: bool,
    /// Luma cutoff for image thresholding; cells brighter than this are set.
    pub threshold: u8,
    /// Upper bound on `width * height` accepted when decoding an envelope.
    pub max_cells: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_method: CompressionMethod::Rle,
            dict_window: 1024,
            dict_min_match: 4,
            dict_escape_marker: true,
            threshold: 127,
            max_cells: 1 << 30, // 128 MiB of packed bits
        }
    }
}

impl CompressionConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dict_window == 0 || self.dict_window > u16::MAX as usize {
            return Err(GridError::Config(format!(
                "dict_window must be within 1..=65535, got {}",
                self.dict_window
            )));
        }
        if self.dict_min_match == 0 || self.dict_min_match > 255 {
            return Err(GridError::Config(format!(
                "dict_min_match must be within 1..=255, got {}",
                self.dict_min_match
            )));
        }
        if self.max_cells == 0 {
            return Err(GridError::Config("max_cells must be positive".into()));
        }
        Ok(())
    }
}
