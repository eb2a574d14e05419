// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture pipeline
//!
//! ```text
//! FrameSource → render_filtered → encode (display)
//!                      │
//!                      └──→ stamp_timestamp → encode (export)
//! ```
//!
//! Both encodings come from one raster snapshot, so mirroring and the
//! active filter are baked into each of them. Only the export copy carries
//! the date/time stamp.

pub mod capture;
pub mod encoding;
pub mod filters;
pub mod font;
pub mod processing;
pub mod stamp;

pub use capture::{CaptureSurface, capture_frame};
pub use encoding::{EncodedImage, encode_jpeg};
pub use filters::{FILTERS, FilterDef, FilterState};
pub use processing::render_filtered;
pub use stamp::{Timestamp, stamp_timestamp};
