// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON at `<config_dir>/pocketpix/config.json`. Every field has
//! a default, so a partial file is valid.

use crate::backends::camera::{SourceRequest, SourceSpec};
use crate::constants::capture::{JPEG_QUALITY, REQUESTED_HEIGHT, REQUESTED_WIDTH};
use crate::errors::ConfigError;
use crate::pipelines::photo::filters::FilterState;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture source: `pattern`, a device index, a `/dev/video*` node or an image path
    pub device: String,
    /// Resolution requested from the device (not guaranteed)
    pub requested_width: u32,
    pub requested_height: u32,
    /// JPEG quality for captures and strips (1-100)
    pub jpeg_quality: u8,
    /// Mirror switch position at startup (selfie mode)
    pub mirror_default: bool,
    /// Where exports are saved; `None` uses ~/Downloads/PocketPix
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: SourceSpec::default().to_string(),
            requested_width: REQUESTED_WIDTH,
            requested_height: REQUESTED_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            mirror_default: true,
            export_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn path() -> PathBuf {
        storage::config_directory().join(CONFIG_FILE)
    }

    /// Load from the default location
    ///
    /// A missing file gives the defaults. A malformed file is logged and
    /// also gives the defaults.
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn source(&self) -> SourceSpec {
        // Parsing a source spec cannot fail
        match self.device.parse() {
            Ok(spec) => spec,
            Err(never) => match never {},
        }
    }

    pub fn request(&self) -> SourceRequest {
        SourceRequest {
            width: self.requested_width,
            height: self.requested_height,
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(storage::default_export_directory)
    }

    pub fn initial_filter(&self) -> FilterState {
        FilterState {
            index: 0,
            mirror: self.mirror_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "device": "pattern" }"#).unwrap();
        assert_eq!(config.source(), SourceSpec::TestPattern);
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.mirror_default);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            mirror_default: false,
            export_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
