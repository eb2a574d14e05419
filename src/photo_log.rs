// SPDX-License-Identifier: GPL-3.0-only

//! Session photo log
//!
//! Ordered, in-memory collection of captures. New records go to the front,
//! so index 0 is always the most recent photo. Records are immutable and
//! shared via `Arc` with views and the exporter.

use crate::pipelines::photo::encoding::EncodedImage;
use crate::pipelines::photo::stamp::Timestamp;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

/// One completed capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Stable identity, used by views to cache decoded thumbnails
    pub id: Uuid,
    /// Filtered and mirrored, no stamp
    pub display_image: EncodedImage,
    /// Same raster with the date/time stamp burned in
    pub export_image: EncodedImage,
    pub stamp: Timestamp,
}

impl PhotoRecord {
    pub fn new(display_image: EncodedImage, export_image: EncodedImage, stamp: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_image,
            export_image,
            stamp,
        }
    }

    pub fn date_stamp(&self) -> &str {
        &self.stamp.date
    }

    pub fn time_stamp(&self) -> &str {
        &self.stamp.time
    }
}

/// Ordered photo log, most recent first
#[derive(Debug, Clone, Default)]
pub struct PhotoLog {
    records: VecDeque<Arc<PhotoRecord>>,
}

impl PhotoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new capture at index 0
    pub fn prepend(&mut self, record: PhotoRecord) -> Arc<PhotoRecord> {
        let record = Arc::new(record);
        self.records.push_front(Arc::clone(&record));
        record
    }

    pub fn get(&self, index: usize) -> Option<&Arc<PhotoRecord>> {
        self.records.get(index)
    }

    /// Resolve a list of indices, failing on the first one that is missing
    pub fn resolve(&self, indices: &[usize]) -> Result<Vec<Arc<PhotoRecord>>, usize> {
        indices
            .iter()
            .map(|&i| self.records.get(i).cloned().ok_or(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PhotoRecord>> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::encoding::encode_jpeg;
    use image::{Rgba, RgbaImage};

    fn record(shade: u8) -> PhotoRecord {
        let raster = RgbaImage::from_pixel(4, 4, Rgba([shade, shade, shade, 255]));
        let image = encode_jpeg(&raster, 90).unwrap();
        PhotoRecord::new(
            image.clone(),
            image,
            Timestamp {
                date: "01/16/04".into(),
                time: "12:04 PM".into(),
            },
        )
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut log = PhotoLog::new();
        let first = log.prepend(record(10));
        let second = log.prepend(record(20));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).unwrap().id, second.id);
        assert_eq!(log.get(1).unwrap().id, first.id);
    }

    #[test]
    fn test_resolve_reports_missing_index() {
        let mut log = PhotoLog::new();
        log.prepend(record(1));
        log.prepend(record(2));

        assert_eq!(log.resolve(&[1, 0]).unwrap().len(), 2);
        assert_eq!(log.resolve(&[0, 5]).unwrap_err(), 5);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = PhotoLog::new();
        log.prepend(record(1));
        log.clear();
        assert!(log.is_empty());
        assert!(log.get(0).is_none());
    }
}
