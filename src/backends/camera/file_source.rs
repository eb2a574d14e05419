// SPDX-License-Identifier: GPL-3.0-only

//! Still image served as a live video source
//!
//! Useful on machines without a camera: the image is decoded once and
//! returned as every frame.

use super::types::{BackendResult, CameraFrame, SourceRequest};
use super::{CaptureDevice, FrameSource};
use crate::errors::BackendError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Image file capture device
#[derive(Debug, Clone)]
pub struct ImageFileDevice {
    path: PathBuf,
}

impl ImageFileDevice {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CaptureDevice for ImageFileDevice {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn acquire(
        &self,
        _request: SourceRequest,
    ) -> BoxFuture<'static, BackendResult<Box<dyn FrameSource>>> {
        let path = self.path.clone();
        Box::pin(async move {
            let frame = tokio::task::spawn_blocking(move || load_image_as_frame(&path))
                .await
                .map_err(|e| BackendError::InitializationFailed(e.to_string()))??;
            Ok::<Box<dyn FrameSource>, BackendError>(Box::new(StillSource {
                frame: Some(Arc::new(frame)),
            }))
        })
    }
}

/// Load an image file as an RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::DeviceNotFound(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    info!(width = rgba.width(), height = rgba.height(), "Image loaded successfully");

    Ok(CameraFrame::from_rgba(rgba))
}

/// Serves the same frame until stopped
pub struct StillSource {
    frame: Option<Arc<CameraFrame>>,
}

impl FrameSource for StillSource {
    fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
