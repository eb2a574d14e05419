// SPDX-License-Identifier: GPL-3.0-only

//! Directory layout
//!
//! Photos live in memory for the session; only exports, the config file
//! and the terminal log touch the disk.

use crate::constants::APP_NAME;
use std::path::PathBuf;
use tracing::info;

/// Lowercase name for XDG config and cache directories
const DIR_NAME: &str = "pocketpix";

/// Default export directory (~/Downloads/PocketPix)
pub fn default_export_directory() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_NAME)
}

/// Directory holding `config.json`
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DIR_NAME)
}

/// Directory for the terminal mode log file
pub fn log_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DIR_NAME)
}

/// Ensure `dir` exists, creating it if necessary
pub fn ensure_directory(dir: PathBuf) -> Result<PathBuf, std::io::Error> {
    std::fs::create_dir_all(&dir)?;
    info!(path = %dir.display(), "Directory ready");
    Ok(dir)
}
