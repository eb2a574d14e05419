// SPDX-License-Identifier: GPL-3.0-only

//! Navigation handlers
//!
//! Cursor movement clamps to the photo log and never wraps. On an empty
//! log every movement is a no-op.

use crate::app::state::{Effect, FilterState, Mode, NavigationState};
use crate::constants::navigation::{GRID_COLUMNS, MENU_ITEMS};

impl NavigationState {
    pub(crate) fn handle_up(&mut self, filter: &mut FilterState, photo_count: usize) -> Option<Effect> {
        match self.mode {
            // The up key doubles as the mirror switch on the viewfinder
            Mode::Camera => self.handle_toggle_mirror(filter),
            Mode::Menu => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
                None
            }
            _ if self.mode.is_grid() => {
                self.move_cursor(-(GRID_COLUMNS as isize), photo_count);
                None
            }
            _ => None,
        }
    }

    pub(crate) fn handle_down(&mut self, photo_count: usize) -> Option<Effect> {
        match self.mode {
            Mode::Menu => {
                self.menu_cursor = (self.menu_cursor + 1).min(MENU_ITEMS - 1);
            }
            _ if self.mode.is_grid() => self.move_cursor(GRID_COLUMNS as isize, photo_count),
            _ => {}
        }
        None
    }

    pub(crate) fn handle_left(&mut self, photo_count: usize) -> Option<Effect> {
        if self.mode.is_gallery() || self.mode.is_select() {
            self.move_cursor(-1, photo_count);
        }
        None
    }

    pub(crate) fn handle_right(&mut self, photo_count: usize) -> Option<Effect> {
        if self.mode.is_gallery() || self.mode.is_select() {
            self.move_cursor(1, photo_count);
        }
        None
    }

    pub(crate) fn handle_toggle_gallery(&mut self) -> Option<Effect> {
        match self.mode {
            Mode::Camera => self.mode = Mode::GallerySingle,
            // Leaving a select mode drops its selection
            Mode::GallerySingle
            | Mode::GalleryGrid
            | Mode::SelectPhotobooth { .. }
            | Mode::SelectZip { .. } => self.mode = Mode::Camera,
            Mode::Menu => {}
        }
        None
    }

    pub(crate) fn handle_home(&mut self) -> Option<Effect> {
        self.mode = Mode::Camera;
        None
    }

    /// `ok` on the grid opens the photo under the cursor
    pub(crate) fn handle_inspect(&mut self, photo_count: usize) -> Option<Effect> {
        self.clamp_cursor(photo_count);
        self.mode = Mode::GallerySingle;
        None
    }

    fn move_cursor(&mut self, delta: isize, photo_count: usize) {
        if photo_count == 0 {
            return;
        }
        let last = photo_count as isize - 1;
        self.gallery_cursor = (self.gallery_cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Keep the gallery cursor inside `[0, photo_count - 1]`
    pub fn clamp_cursor(&mut self, photo_count: usize) {
        self.gallery_cursor = self.gallery_cursor.min(photo_count.saturating_sub(1));
    }
}
