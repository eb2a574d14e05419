// SPDX-License-Identifier: GPL-3.0-only

//! Selection handlers
//!
//! Both select flows toggle the photo under the cursor. The photobooth flow
//! keeps pick order and completes on its fourth pick; the zip flow has no
//! cap and completes from the menu button.

use crate::app::state::{Effect, Mode, NavigationState};
use crate::constants::photobooth::PANEL_COUNT;
use tracing::info;

/// Remove `index` if present, otherwise append it while under `cap`
fn toggle(selection: &mut Vec<usize>, index: usize, cap: Option<usize>) {
    if let Some(pos) = selection.iter().position(|&i| i == index) {
        selection.remove(pos);
    } else if cap.is_none_or(|cap| selection.len() < cap) {
        selection.push(index);
    }
}

impl NavigationState {
    /// Start a select flow with an empty selection and the cursor on the newest photo
    pub(crate) fn enter_select(&mut self, mode: Mode) {
        debug_assert!(mode.selection().is_empty());
        self.gallery_cursor = 0;
        self.mode = mode;
    }

    pub(crate) fn handle_select_ok(&mut self, photo_count: usize) -> Option<Effect> {
        let cursor = self.gallery_cursor;
        if cursor >= photo_count {
            return None;
        }

        let completed = match &mut self.mode {
            Mode::SelectPhotobooth { selection } => {
                toggle(selection, cursor, Some(PANEL_COUNT));
                if selection.len() == PANEL_COUNT {
                    <[usize; PANEL_COUNT]>::try_from(selection.as_slice()).ok()
                } else {
                    None
                }
            }
            Mode::SelectZip { selection } => {
                toggle(selection, cursor, None);
                None
            }
            _ => None,
        };

        let picks = completed?;
        info!(?picks, "Photobooth selection complete");
        self.mode = Mode::Menu;
        Some(Effect::ExportPhotobooth(picks))
    }
}
