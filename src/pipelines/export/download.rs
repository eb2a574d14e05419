// SPDX-License-Identifier: GPL-3.0-only

//! Local save of exported files

use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Hands a finished export to the user
///
/// Fire-and-forget: failures are logged by the implementation and never
/// reported back to the caller.
pub trait DownloadTrigger: Send + Sync {
    fn trigger(&self, filename: &str, bytes: &[u8]);
}

/// Saves downloads into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadTrigger for DirectoryDownloads {
    fn trigger(&self, filename: &str, bytes: &[u8]) {
        // Only the final path component is honored
        let Some(name) = Path::new(filename).file_name() else {
            error!(filename, "Download rejected, no file name");
            return;
        };
        let path = self.dir.join(name);

        let result = std::fs::create_dir_all(&self.dir).and_then(|_| std::fs::write(&path, bytes));
        match result {
            Ok(()) => info!(path = %path.display(), size = bytes.len(), "Download saved"),
            Err(e) => error!(path = %path.display(), error = %e, "Download failed"),
        }
    }
}
