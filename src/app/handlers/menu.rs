// SPDX-License-Identifier: GPL-3.0-only

//! Menu handlers
//!
//! The menu button toggles between the viewfinder and the menu, and ends a
//! select flow. Menu entries either open a select flow, ask to delete
//! everything, or go back.

use crate::app::state::{Effect, MenuItem, Mode, NavigationState, Warning};
use crate::constants::photobooth::PANEL_COUNT;
use tracing::info;

impl NavigationState {
    pub(crate) fn handle_menu_button(&mut self) -> Option<Effect> {
        match &mut self.mode {
            Mode::Camera => {
                self.mode = Mode::Menu;
                None
            }
            Mode::Menu => {
                self.mode = Mode::Camera;
                None
            }
            Mode::SelectZip { selection } if !selection.is_empty() => {
                let picks = std::mem::take(selection);
                self.mode = Mode::Menu;
                Some(Effect::ExportZip(picks))
            }
            Mode::SelectZip { .. } => {
                self.mode = Mode::Menu;
                Some(Effect::Warn(Warning::EmptySelection))
            }
            // A partial photobooth pick is abandoned
            Mode::SelectPhotobooth { .. } => {
                self.mode = Mode::Menu;
                None
            }
            Mode::GallerySingle | Mode::GalleryGrid => None,
        }
    }

    pub(crate) fn handle_menu_ok(&mut self, photo_count: usize) -> Option<Effect> {
        match self.menu_item()? {
            MenuItem::Photobooth => {
                if photo_count < PANEL_COUNT {
                    return Some(Effect::Warn(Warning::NotEnoughPhotos {
                        required: PANEL_COUNT,
                        available: photo_count,
                    }));
                }
                self.enter_select(Mode::SelectPhotobooth {
                    selection: Vec::new(),
                });
                None
            }
            MenuItem::ExportZip => {
                if photo_count > 0 {
                    self.enter_select(Mode::SelectZip {
                        selection: Vec::new(),
                    });
                }
                None
            }
            MenuItem::DeleteAll => Some(Effect::ConfirmDeleteAll),
            MenuItem::Back => {
                self.mode = Mode::Camera;
                None
            }
        }
    }

    /// The user confirmed deleting every photo and the log is now empty
    pub fn handle_log_cleared(&mut self) {
        info!("Photo log cleared");
        self.gallery_cursor = 0;
        self.mode = Mode::Camera;
    }
}
