// SPDX-License-Identifier: GPL-3.0-only

//! Command handler modules
//!
//! Handlers are grouped by functional domain. Each is an `impl
//! NavigationState` block with `pub(crate)` handler methods called from
//! `update()`.

pub mod camera;
pub mod menu;
pub mod navigation;
pub mod selection;
