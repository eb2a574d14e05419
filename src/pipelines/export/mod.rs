// SPDX-License-Identifier: GPL-3.0-only

//! Export pipeline
//!
//! Two paths out of the photo log:
//!
//! - **Photobooth**: four display images composited into one strip JPEG
//! - **Zip**: any number of stamped export images packed into an archive
//!
//! Both run asynchronously so input handling stays responsive. Records are
//! resolved from the photo log by the caller before an export starts, so
//! the export works on an immutable snapshot. Either a complete file is
//! handed to the download trigger or nothing is.

pub mod archive;
pub mod download;
pub mod photobooth;

pub use archive::{ArchivePackager, ZipPackager};
pub use download::{DirectoryDownloads, DownloadTrigger};
pub use photobooth::compose_strip;

use crate::constants::APP_NAME;
use crate::constants::capture::JPEG_QUALITY;
use crate::constants::export::{TIMESTAMP_FORMAT, entry_name};
use crate::errors::ExportError;
use crate::photo_log::PhotoRecord;
use crate::pipelines::photo::encoding::encode_jpeg;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// File name for a photobooth strip exported at `now`
pub fn photobooth_filename(now: &DateTime<Local>) -> String {
    format!("{}_Photobooth_{}.jpg", APP_NAME, now.format(TIMESTAMP_FORMAT))
}

/// File name for a zip export created at `now`
pub fn archive_filename(now: &DateTime<Local>) -> String {
    format!("{}_Memories_{}.zip", APP_NAME, now.format(TIMESTAMP_FORMAT))
}

/// Runs exports against its packaging and download collaborators
#[derive(Clone)]
pub struct Exporter {
    packager: Arc<dyn ArchivePackager>,
    downloads: Arc<dyn DownloadTrigger>,
    quality: u8,
}

impl Exporter {
    pub fn new(packager: Arc<dyn ArchivePackager>, downloads: Arc<dyn DownloadTrigger>) -> Self {
        Self {
            packager,
            downloads,
            quality: JPEG_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Composite four records, in selection order, and download the strip
    ///
    /// Returns the file name handed to the download trigger.
    pub async fn export_photobooth(&self, records: Vec<Arc<PhotoRecord>>) -> Result<String, ExportError> {
        let quality = self.quality;
        let downloads = Arc::clone(&self.downloads);

        tokio::task::spawn_blocking(move || {
            let strip = compose_strip(&records)?;
            let encoded =
                encode_jpeg(&strip, quality).map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

            let filename = photobooth_filename(&Local::now());
            downloads.trigger(&filename, encoded.bytes());
            info!(file = %filename, size = encoded.len(), "Photobooth strip exported");
            Ok(filename)
        })
        .await
        .map_err(ExportError::from)?
    }

    /// Pack the export images of `selection` (log index, record) into a zip
    ///
    /// Entry names come from each record's log index. Returns the archive's
    /// file name.
    pub async fn export_zip(&self, selection: Vec<(usize, Arc<PhotoRecord>)>) -> Result<String, ExportError> {
        if selection.is_empty() {
            return Err(ExportError::WrongSelection {
                expected: 1,
                actual: 0,
            });
        }

        let entries: BTreeMap<String, String> = selection
            .iter()
            .map(|(index, record)| (entry_name(*index), record.export_image.to_base64()))
            .collect();
        debug!(entries = entries.len(), "Packaging archive");

        let blob = self.packager.package(entries).await?;

        let filename = archive_filename(&Local::now());
        let downloads = Arc::clone(&self.downloads);
        let size = blob.len();
        let saved = filename.clone();
        tokio::task::spawn_blocking(move || downloads.trigger(&saved, &blob))
            .await
            .map_err(ExportError::from)?;

        info!(file = %filename, size, photos = selection.len(), "Zip archive exported");
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filenames_carry_timestamp() {
        let now = Local.with_ymd_and_hms(2005, 6, 1, 14, 3, 9).unwrap();
        assert_eq!(photobooth_filename(&now), "PocketPix_Photobooth_20050601_140309.jpg");
        assert_eq!(archive_filename(&now), "PocketPix_Memories_20050601_140309.zip");
    }
}
