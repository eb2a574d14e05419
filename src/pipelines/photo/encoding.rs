// SPDX-License-Identifier: GPL-3.0-only

//! Lossy still encoding
//!
//! Rasters are kept as RGBA while they are being drawn on and flattened
//! to RGB JPEG when stored.

use crate::errors::PhotoError;
use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbaImage};
use std::sync::Arc;
use tracing::debug;

/// An encoded still, cheap to clone
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EncodedImage({}x{}, {} bytes)",
            self.width,
            self.height,
            self.bytes.len()
        )
    }
}

impl EncodedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 payload without any data-URI prefix
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Wrap bytes that were never produced by the encoder
    #[cfg(test)]
    pub(crate) fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes: Arc::from(bytes.into_boxed_slice()),
            width,
            height,
        }
    }

    /// Decode back into a raster
    pub fn decode(&self) -> Result<RgbaImage, PhotoError> {
        let image = image::load_from_memory_with_format(&self.bytes, ImageFormat::Jpeg)?;
        Ok(image.to_rgba8())
    }
}

/// Encode an RGBA raster as JPEG at `quality` (1-100)
pub fn encode_jpeg(raster: &RgbaImage, quality: u8) -> Result<EncodedImage, PhotoError> {
    let (width, height) = raster.dimensions();
    let rgb: Vec<u8> = raster
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();

    let mut buffer = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder
            .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;
    }

    debug!(width, height, size = buffer.len(), "JPEG encoded");

    Ok(EncodedImage {
        bytes: Arc::from(buffer.into_boxed_slice()),
        width,
        height,
    })
}
