// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic color-bar source

use super::types::{BackendResult, CameraFrame, SourceRequest};
use super::{CaptureDevice, FrameSource};
use crate::errors::BackendError;
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// SMPTE-ish bars, top to bottom gradient in brightness
const BARS: [[u8; 3]; 7] = [
    [235, 235, 235],
    [235, 235, 16],
    [16, 235, 235],
    [16, 235, 16],
    [235, 16, 235],
    [235, 16, 16],
    [16, 16, 235],
];

/// Test pattern capture device
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPatternDevice;

impl CaptureDevice for TestPatternDevice {
    fn name(&self) -> String {
        "Test pattern".to_string()
    }

    fn acquire(
        &self,
        request: SourceRequest,
    ) -> BoxFuture<'static, BackendResult<Box<dyn FrameSource>>> {
        Box::pin(async move {
            let frame = CameraFrame::from_rgba(color_bars(request.width, request.height));
            Ok::<Box<dyn FrameSource>, BackendError>(Box::new(PatternSource {
                frame: Some(Arc::new(frame)),
            }))
        })
    }
}

/// Render vertical color bars with a vertical brightness ramp
pub fn color_bars(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let bar = BARS[(x as usize * BARS.len()) / width.max(1) as usize];
        let shade = 1.0 - 0.5 * (y as f32 / height.max(1) as f32);
        Rgba([
            (bar[0] as f32 * shade) as u8,
            (bar[1] as f32 * shade) as u8,
            (bar[2] as f32 * shade) as u8,
            255,
        ])
    })
}

struct PatternSource {
    frame: Option<Arc<CameraFrame>>,
}

impl FrameSource for PatternSource {
    fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
