// SPDX-License-Identifier: GPL-3.0-only

//! Archive packaging
//!
//! The packager receives entry names mapped to base64 payloads (the export
//! images with their data-URI prefix stripped) and yields one archive blob.

use crate::errors::ExportError;
use base64::{Engine as _, engine::general_purpose};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;

/// Builds an archive blob from named base64 entries
pub trait ArchivePackager: Send + Sync {
    fn package(&self, entries: BTreeMap<String, String>) -> BoxFuture<'static, Result<Vec<u8>, ExportError>>;
}

/// Zip packager; encoding runs on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ArchivePackager for ZipPackager {
    fn package(&self, entries: BTreeMap<String, String>) -> BoxFuture<'static, Result<Vec<u8>, ExportError>> {
        Box::pin(async move {
            tokio::task::spawn_blocking(move || write_zip(&entries))
                .await
                .map_err(ExportError::from)?
        })
    }
}

/// Write `entries` into an in-memory zip archive
pub fn write_zip(entries: &BTreeMap<String, String>) -> Result<Vec<u8>, ExportError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, payload) in entries {
        let bytes = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ExportError::Packaging(format!("{}: invalid base64: {}", name, e)))?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ExportError::Packaging(e.to_string()))?;
        writer
            .write_all(&bytes)
            .map_err(|e| ExportError::Packaging(e.to_string()))?;
        debug!(entry = %name, size = bytes.len(), "Archive entry written");
    }

    let cursor = writer
        .finish()
        .map_err(|e| ExportError::Packaging(e.to_string()))?;
    Ok(cursor.into_inner())
}
