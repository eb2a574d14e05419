// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for capture devices
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Session                     │
//! └────────────────────┬────────────────────────┘
//!                      │ acquire / current_frame / stop
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌──────────┐ ┌────────────┐ ┌───────────┐  │
//! │  │   V4L2   │ │ Image file │ │  Pattern  │  │
//! │  └──────────┘ └────────────┘ └───────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`camera`]: Device enumeration, acquisition and live frames

pub mod camera;
