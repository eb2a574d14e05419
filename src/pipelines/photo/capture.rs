// SPDX-License-Identifier: GPL-3.0-only

//! Capture surface
//!
//! Owns the live frame source and turns the current frame into a
//! [`PhotoRecord`]: one unstamped display encoding and one stamped export
//! encoding of the same filtered, mirrored raster.

use super::encoding::encode_jpeg;
use super::filters::FilterState;
use super::processing::render_filtered;
use super::stamp::{Timestamp, stamp_timestamp};
use crate::backends::camera::{CameraFrame, CaptureDevice, FrameSource, SourceRequest};
use crate::constants::capture::JPEG_QUALITY;
use crate::errors::PhotoError;
use crate::photo_log::PhotoRecord;
use chrono::{DateTime, TimeZone};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Build a record from one frame
///
/// The frame is rendered once; the stamp is drawn onto a copy of that raster
/// so the display image never carries it.
pub fn capture_frame<Tz: TimeZone>(
    frame: &CameraFrame,
    filter: &FilterState,
    now: &DateTime<Tz>,
    quality: u8,
) -> Result<PhotoRecord, PhotoError>
where
    Tz::Offset: std::fmt::Display,
{
    if !frame.is_ready() {
        return Err(PhotoError::NoFrameAvailable);
    }

    let raster = render_filtered(frame, filter.filter(), filter.mirror)?;
    let display_image = encode_jpeg(&raster, quality)?;

    let stamp = Timestamp::at(now);
    let stamped = stamp_timestamp(&raster, &stamp);
    let export_image = encode_jpeg(&stamped, quality)?;

    Ok(PhotoRecord::new(display_image, export_image, stamp))
}

/// The live view and shutter
pub struct CaptureSurface {
    source: Option<Box<dyn FrameSource>>,
    quality: u8,
}

impl Default for CaptureSurface {
    fn default() -> Self {
        Self::idle()
    }
}

impl CaptureSurface {
    /// A surface with no source; it never produces a record
    pub fn idle() -> Self {
        Self {
            source: None,
            quality: JPEG_QUALITY,
        }
    }

    pub fn with_source(source: Box<dyn FrameSource>) -> Self {
        Self {
            source: Some(source),
            quality: JPEG_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Acquire a live source from `device`
    ///
    /// Failure is logged and leaves the surface idle.
    pub async fn open(device: &dyn CaptureDevice, request: SourceRequest) -> Self {
        info!(device = %device.name(), width = request.width, height = request.height, "Acquiring capture device");
        match device.acquire(request).await {
            Ok(source) => Self::with_source(source),
            Err(e) => {
                error!(device = %device.name(), error = %e, "Capture device unavailable");
                Self::idle()
            }
        }
    }

    /// Install a source, stopping any previous one
    pub fn attach(&mut self, source: Box<dyn FrameSource>) {
        self.shutdown();
        self.source = Some(source);
    }

    pub fn is_live(&self) -> bool {
        self.source.is_some()
    }

    /// Current frame for the viewfinder
    pub fn preview_frame(&self) -> Option<Arc<CameraFrame>> {
        self.source.as_ref()?.current_frame()
    }

    /// Press the shutter
    ///
    /// Returns `None` when no source is attached, the source has not produced
    /// a usable frame yet, or the frame could not be rendered or encoded.
    pub fn capture(&self, filter: &FilterState) -> Option<PhotoRecord> {
        let frame = self.preview_frame()?;
        match capture_frame(&frame, filter, &chrono::Local::now(), self.quality) {
            Ok(record) => {
                debug!(
                    id = %record.id,
                    display_size = record.display_image.len(),
                    export_size = record.export_image.len(),
                    "Photo captured"
                );
                Some(record)
            }
            Err(PhotoError::NoFrameAvailable) => {
                debug!("Shutter ignored, frame source not ready");
                None
            }
            Err(e) => {
                warn!(error = %e, "Capture aborted");
                None
            }
        }
    }

    /// Release the live source
    pub fn shutdown(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
            info!("Capture source released");
        }
    }
}

impl Drop for CaptureSurface {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedSource {
        frame: Option<Arc<CameraFrame>>,
        stopped: Arc<AtomicBool>,
    }

    impl FrameSource for FixedSource {
        fn current_frame(&self) -> Option<Arc<CameraFrame>> {
            self.frame.clone()
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }
    }

    fn surface_with(frame: CameraFrame) -> (CaptureSurface, Arc<AtomicBool>) {
        let stopped = Arc::new(AtomicBool::new(false));
        let source = FixedSource {
            frame: Some(Arc::new(frame)),
            stopped: Arc::clone(&stopped),
        };
        (CaptureSurface::with_source(Box::new(source)), stopped)
    }

    fn noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2004, 1, 16, 12, 4, 0)
            .unwrap()
    }

    #[test]
    fn test_zero_dimension_frame_is_noop() {
        let (surface, _) = surface_with(CameraFrame::from_rgba(RgbaImage::new(0, 0)));
        assert!(surface.capture(&FilterState::default()).is_none());
    }

    #[test]
    fn test_idle_surface_never_captures() {
        let surface = CaptureSurface::idle();
        assert!(!surface.is_live());
        assert!(surface.capture(&FilterState::default()).is_none());
    }

    #[test]
    fn test_export_differs_from_display() {
        let frame = CameraFrame::from_rgba(RgbaImage::from_pixel(320, 240, Rgba([20, 40, 120, 255])));
        let record = capture_frame(&frame, &FilterState::default(), &noon(), 90).unwrap();

        assert_eq!(record.display_image.width, 320);
        assert_eq!(record.export_image.height, 240);
        assert_ne!(record.display_image.bytes(), record.export_image.bytes());
    }

    #[test]
    fn test_stamp_strings_match_capture_time() {
        let frame = CameraFrame::from_rgba(RgbaImage::from_pixel(64, 48, Rgba([0, 0, 0, 255])));
        let record = capture_frame(&frame, &FilterState::default(), &noon(), 90).unwrap();
        assert_eq!(record.date_stamp(), "01/16/04");
        assert_eq!(record.time_stamp(), "12:04 PM");
    }

    #[test]
    fn test_shutdown_stops_source() {
        let (mut surface, stopped) = surface_with(CameraFrame::from_rgba(RgbaImage::new(2, 2)));
        surface.shutdown();
        assert!(stopped.load(Ordering::SeqCst));
        assert!(!surface.is_live());
        assert!(surface.preview_frame().is_none());
    }
}
