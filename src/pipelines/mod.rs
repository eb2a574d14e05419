// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  PhotoRecord │
//! │              │     │  - Filter, mirror │     │  (display +  │
//! │              │     │  - Stamp          │     │   export)    │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │  Photo Log   │ ──▶ │  Export Pipeline  │ ──▶ │ Strip JPEG / │
//! │  selection   │     │  - Photobooth     │     │  ZIP archive │
//! │              │     │  - Archive        │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! - [`photo`]: capture surface, filters, timestamp stamp, JPEG encoding
//! - [`export`]: photobooth strip compositor and zip packaging

pub mod export;
pub mod photo;
