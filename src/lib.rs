// SPDX-License-Identifier: GPL-3.0-only

//! PocketPix - a 2000s pocket digicam for the terminal
//!
//! Captures frames from a live video source, bakes in a vintage filter and
//! mirroring, burns a date/time stamp into an export copy, and keeps every
//! shot in an in-memory photo log. Photos leave the session as a 4-panel
//! photobooth strip or as a zip archive.
//!
//! # Architecture
//!
//! - [`app`]: Session owner and the mode/navigation state machine
//! - [`backends`]: Capture device abstraction (V4L2, still image, test pattern)
//! - [`pipelines`]: Capture surface and exporter
//! - [`photo_log`]: Ordered photo log
//! - [`config`]: User configuration handling
//! - [`storage`]: Config, cache and export directories
//! - [`terminal`]: Interactive terminal front end
//!
//! # Example
//!
//! ```ignore
//! // Interactive terminal camera:
//! // pocketpix
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod photo_log;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{Command, Mode, NavigationState, Session};
pub use config::Config;
pub use photo_log::{PhotoLog, PhotoRecord};
