// SPDX-License-Identifier: GPL-3.0-only

//! Camera handlers
//!
//! Shutter, filter dial, mirror switch and the zoom-out to the grid. All of
//! them only act on the live viewfinder.

use crate::app::state::{Effect, FilterState, Mode, NavigationState};
use tracing::info;

impl NavigationState {
    pub(crate) fn handle_shutter(&mut self) -> Option<Effect> {
        (self.mode == Mode::Camera).then_some(Effect::Capture)
    }

    pub(crate) fn handle_cycle_filter(&mut self, filter: &mut FilterState) -> Option<Effect> {
        if self.mode == Mode::Camera {
            filter.cycle();
            info!(filter = filter.filter().name, "Filter changed");
        }
        None
    }

    pub(crate) fn handle_toggle_mirror(&mut self, filter: &mut FilterState) -> Option<Effect> {
        if self.mode == Mode::Camera {
            filter.toggle_mirror();
            info!(mirror = filter.mirror, "Mirror toggled");
        }
        None
    }

    pub(crate) fn handle_zoom_toggle(&mut self, photo_count: usize) -> Option<Effect> {
        if self.mode == Mode::Camera && photo_count > 0 {
            self.clamp_cursor(photo_count);
            self.mode = Mode::GalleryGrid;
        }
        None
    }

    /// A new photo was prepended to the log
    ///
    /// The gallery opens on the newest photo afterwards.
    pub fn handle_photo_added(&mut self) {
        self.gallery_cursor = 0;
    }
}
