// SPDX-License-Identifier: GPL-3.0-only
// Shared types for capture device abstraction

//! Shared types for capture devices

use crate::errors::{BackendError, PhotoError};
use image::RgbaImage;
use std::sync::Arc;

/// Result type for capture device operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Pixel layout of a [`CameraFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, R G B A
    RGBA,
    /// 3 bytes per pixel, R G B
    RGB24,
    /// Packed 4:2:2, Y0 U Y1 V per pixel pair
    YUYV,
}

impl PixelFormat {
    /// Minimum bytes per row for a frame of the given width
    pub fn min_stride(&self, width: u32) -> u32 {
        match self {
            PixelFormat::RGBA => width * 4,
            PixelFormat::RGB24 => width * 3,
            PixelFormat::YUYV => width.div_ceil(2) * 4,
        }
    }
}

/// A single frame from a live video source
///
/// Frames are immutable and shared via `Arc` between the device thread,
/// the preview and the capture pipeline.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Bytes per row
    pub stride: u32,
}

impl CameraFrame {
    /// Wrap an RGBA image as a frame
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw().into_boxed_slice()),
            format: PixelFormat::RGBA,
            stride: width * 4,
        }
    }

    /// A frame source that is not ready yet reports zero dimensions
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Convert to an RGBA raster at native resolution
    pub fn to_rgba_image(&self) -> Result<RgbaImage, PhotoError> {
        if !self.is_ready() {
            return Err(PhotoError::NoFrameAvailable);
        }

        let width = self.width as usize;
        let height = self.height as usize;
        let stride = self.stride as usize;
        let expected = stride * (height - 1) + self.format.min_stride(self.width) as usize;
        if stride < self.format.min_stride(self.width) as usize || self.data.len() < expected {
            return Err(PhotoError::FrameTooSmall {
                expected,
                actual: self.data.len(),
            });
        }

        let mut rgba = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let row = &self.data[y * stride..];
            match self.format {
                PixelFormat::RGBA => rgba.extend_from_slice(&row[..width * 4]),
                PixelFormat::RGB24 => {
                    for px in row[..width * 3].chunks_exact(3) {
                        rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
                    }
                }
                PixelFormat::YUYV => {
                    for x in 0..width {
                        let base = (x & !1) * 2;
                        let luma = if x & 1 == 0 { row[base] } else { row[base + 2] };
                        let (r, g, b) = yuv_to_rgb(luma, row[base + 1], row[base + 3]);
                        rgba.extend_from_slice(&[r, g, b, 255]);
                    }
                }
            }
        }

        RgbaImage::from_raw(self.width, self.height, rgba).ok_or(PhotoError::FrameTooSmall {
            expected: width * height * 4,
            actual: 0,
        })
    }
}

/// Convert YUV (BT.601) to RGB
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}

/// A capture device that can be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name
    pub name: String,
    /// Device node path (e.g. /dev/video0)
    pub path: String,
}

/// Resolution requested when acquiring a live source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRequest {
    pub width: u32,
    pub height: u32,
}

impl Default for SourceRequest {
    fn default() -> Self {
        Self {
            width: crate::constants::capture::REQUESTED_WIDTH,
            height: crate::constants::capture::REQUESTED_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_frame_is_not_ready() {
        let frame = CameraFrame {
            width: 0,
            height: 720,
            data: Arc::from(Vec::new().into_boxed_slice()),
            format: PixelFormat::RGBA,
            stride: 0,
        };
        assert!(!frame.is_ready());
        assert!(matches!(
            frame.to_rgba_image(),
            Err(PhotoError::NoFrameAvailable)
        ));
    }

    #[test]
    fn test_rgb24_expands_to_opaque_rgba() {
        let frame = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![10u8, 20, 30, 40, 50, 60].into_boxed_slice()),
            format: PixelFormat::RGB24,
            stride: 6,
        };
        let image = frame.to_rgba_image().unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [40, 50, 60, 255]);
    }

    #[test]
    fn test_yuyv_gray_decodes_to_gray() {
        // Y=128 with neutral chroma is mid gray
        let frame = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![128u8, 128, 128, 128].into_boxed_slice()),
            format: PixelFormat::YUYV,
            stride: 4,
        };
        let image = frame.to_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: Arc::from(vec![0u8; 10].into_boxed_slice()),
            format: PixelFormat::RGBA,
            stride: 16,
        };
        assert!(matches!(
            frame.to_rgba_image(),
            Err(PhotoError::FrameTooSmall { .. })
        ));
    }
}
