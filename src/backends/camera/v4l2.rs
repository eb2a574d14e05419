// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 capture device
//!
//! Opens a video node, negotiates YUYV (falling back to MJPG) near the
//! requested resolution and streams memory-mapped buffers on a dedicated
//! thread into a [`FrameSlot`].

use super::types::{BackendResult, CameraDevice, CameraFrame, PixelFormat, SourceRequest};
use super::{CaptureDevice, FrameSlot, FrameSource};
use crate::constants::capture::V4L2_BUFFER_COUNT;
use crate::errors::BackendError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// A V4L2 video node
#[derive(Debug, Clone)]
pub struct V4l2Device {
    path: String,
}

impl V4l2Device {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureDevice for V4l2Device {
    fn name(&self) -> String {
        self.path.clone()
    }

    fn acquire(
        &self,
        request: SourceRequest,
    ) -> BoxFuture<'static, BackendResult<Box<dyn FrameSource>>> {
        let path = self.path.clone();
        Box::pin(async move {
            // Opening and negotiating blocks on ioctls
            let source = tokio::task::spawn_blocking(move || V4l2Source::start(&path, request))
                .await
                .map_err(|e| BackendError::InitializationFailed(e.to_string()))??;
            Ok::<Box<dyn FrameSource>, BackendError>(Box::new(source))
        })
    }
}

/// Running V4L2 stream
pub struct V4l2Source {
    slot: FrameSlot,
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl V4l2Source {
    fn start(path: &str, request: SourceRequest) -> BackendResult<Self> {
        info!(path, width = request.width, height = request.height, "Opening V4L2 device");

        let dev = Device::with_path(path)
            .map_err(|e| BackendError::DeviceNotFound(format!("{}: {}", path, e)))?;

        let format = negotiate_format(&dev, request)?;
        info!(
            width = format.width,
            height = format.height,
            fourcc = ?format.fourcc,
            "V4L2 format configured"
        );

        let slot = FrameSlot::new();
        let stop_signal = Arc::new(AtomicBool::new(false));

        let thread_slot = slot.clone();
        let thread_stop = Arc::clone(&stop_signal);
        let thread_path = path.to_string();
        let thread = std::thread::Builder::new()
            .name("pocketpix-v4l2".into())
            .spawn(move || {
                if let Err(e) = capture_loop(dev, format, thread_slot, thread_stop) {
                    error!(path = %thread_path, error = %e, "V4L2 capture loop failed");
                }
            })
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        Ok(Self {
            slot,
            stop_signal,
            thread: Some(thread),
        })
    }
}

impl FrameSource for V4l2Source {
    fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        self.slot.latest()
    }

    fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("V4L2 capture thread panicked");
            }
            info!("V4L2 stream stopped");
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        self.stop();
    }
}

fn negotiate_format(dev: &Device, request: SourceRequest) -> BackendResult<Format> {
    let yuyv = FourCC::new(b"YUYV");
    let mjpg = FourCC::new(b"MJPG");

    for fourcc in [yuyv, mjpg] {
        let wanted = Format::new(request.width, request.height, fourcc);
        match dev.set_format(&wanted) {
            Ok(actual) if actual.fourcc == fourcc => return Ok(actual),
            Ok(actual) => {
                debug!(requested = ?fourcc, got = ?actual.fourcc, "Driver substituted format");
            }
            Err(e) => debug!(fourcc = ?fourcc, error = %e, "Format rejected"),
        }
    }

    Err(BackendError::FormatNotSupported(
        "device offers neither YUYV nor MJPG".to_string(),
    ))
}

fn capture_loop(
    dev: Device,
    format: Format,
    slot: FrameSlot,
    stop_signal: Arc<AtomicBool>,
) -> BackendResult<()> {
    let mut stream = Stream::with_buffers(&dev, Type::VideoCapture, V4L2_BUFFER_COUNT)?;
    let is_mjpg = format.fourcc == FourCC::new(b"MJPG");

    info!("V4L2 capture loop started");

    while !stop_signal.load(Ordering::SeqCst) {
        let (buf, meta) = match stream.next() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to dequeue frame");
                continue;
            }
        };

        let used = (meta.bytesused as usize).min(buf.len());
        let bytes = &buf[..used];

        let frame = if is_mjpg {
            match image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg) {
                Ok(decoded) => CameraFrame::from_rgba(decoded.to_rgba8()),
                Err(e) => {
                    debug!(error = %e, "Dropping undecodable MJPG frame");
                    continue;
                }
            }
        } else {
            CameraFrame {
                width: format.width,
                height: format.height,
                data: Arc::from(bytes.to_vec().into_boxed_slice()),
                format: PixelFormat::YUYV,
                stride: format.stride,
            }
        };

        slot.publish(frame);
    }

    info!("V4L2 capture loop stopped");
    Ok(())
}

/// Enumerate V4L2 nodes that can capture video
pub fn enumerate_devices() -> Vec<CameraDevice> {
    v4l::context::enum_devices()
        .into_iter()
        .filter(|node| {
            Device::with_path(node.path())
                .and_then(|dev| dev.query_caps())
                .map(|caps| caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE))
                .unwrap_or(false)
        })
        .map(|node| CameraDevice {
            name: node
                .name()
                .unwrap_or_else(|| format!("Camera {}", node.index())),
            path: node.path().display().to_string(),
        })
        .collect()
}
