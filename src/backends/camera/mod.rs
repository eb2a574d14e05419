// SPDX-License-Identifier: GPL-3.0-only

//! Capture device abstraction
//!
//! The live video feed is an external collaborator. It is consumed through
//! two narrow traits:
//!
//! ```text
//! ┌─────────────────────┐   acquire() (async, once at mount)
//! │   CaptureDevice     │ ─────────────────────────────────┐
//! └─────────────────────┘                                  ▼
//!                                              ┌─────────────────────┐
//!                                              │    FrameSource      │ ← latest frame
//!                                              └─────────────────────┘
//!       ┌──────┐   ┌────────────┐   ┌─────────────┐
//!       │ V4L2 │   │ Image file │   │ Test pattern│  ← implementations
//!       └──────┘   └────────────┘   └─────────────┘
//! ```
//!
//! Acquisition failures are reported to the caller, which logs them and
//! leaves the capture surface idle.

pub mod file_source;
pub mod test_pattern;
pub mod types;
pub mod v4l2;

pub use file_source::ImageFileDevice;
pub use test_pattern::TestPatternDevice;
pub use types::*;
pub use v4l2::V4l2Device;

use futures::future::BoxFuture;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// A running live video source
///
/// Dropping or stopping the source releases the underlying device.
pub trait FrameSource: Send {
    /// Most recent frame, or `None` when nothing has arrived yet
    fn current_frame(&self) -> Option<Arc<CameraFrame>>;

    /// Stop streaming and release the device. Safe to call more than once.
    fn stop(&mut self);
}

/// A device that can asynchronously hand out a live video source
pub trait CaptureDevice: Send + Sync {
    /// Display name for logs and the status bar
    fn name(&self) -> String;

    /// Acquire a live source at (approximately) the requested resolution
    fn acquire(
        &self,
        request: SourceRequest,
    ) -> BoxFuture<'static, BackendResult<Box<dyn FrameSource>>>;
}

/// Latest-frame slot shared between a device thread and its readers
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Option<Arc<CameraFrame>>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored frame
    pub fn publish(&self, frame: CameraFrame) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(Arc::new(frame));
        }
    }

    pub fn latest(&self) -> Option<Arc<CameraFrame>> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Which capture device to open, as given on the command line or in config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Synthetic color bars
    TestPattern,
    /// A still image served as the live frame
    ImageFile(PathBuf),
    /// A V4L2 device node
    V4l2(String),
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::V4l2("/dev/video0".to_string())
    }
}

impl FromStr for SourceSpec {
    type Err = std::convert::Infallible;

    /// `pattern`, a device index (`0`), a device node (`/dev/video2`), or an image path
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("pattern") || s.eq_ignore_ascii_case("test") {
            Ok(SourceSpec::TestPattern)
        } else if let Ok(index) = s.parse::<u32>() {
            Ok(SourceSpec::V4l2(format!("/dev/video{}", index)))
        } else if s.starts_with("/dev/") {
            Ok(SourceSpec::V4l2(s.to_string()))
        } else {
            Ok(SourceSpec::ImageFile(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSpec::TestPattern => write!(f, "pattern"),
            SourceSpec::ImageFile(path) => write!(f, "{}", path.display()),
            SourceSpec::V4l2(path) => write!(f, "{}", path),
        }
    }
}

impl SourceSpec {
    /// Build the capture device for this spec
    pub fn device(&self) -> Box<dyn CaptureDevice> {
        match self {
            SourceSpec::TestPattern => Box::new(TestPatternDevice),
            SourceSpec::ImageFile(path) => Box::new(ImageFileDevice::new(path.clone())),
            SourceSpec::V4l2(path) => Box::new(V4l2Device::new(path.clone())),
        }
    }
}

/// List V4L2 video capture devices on this system
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    v4l2::enumerate_devices()
}
