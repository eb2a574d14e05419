// SPDX-License-Identifier: GPL-3.0-only

//! Command update handling
//!
//! The `update()` function is the single entry point of the navigation
//! state machine. It routes each command to a focused handler in the
//! `handlers` submodules:
//!
//! - `handlers::camera`: shutter, filter dial, mirror, grid zoom
//! - `handlers::navigation`: cursor movement, gallery toggle, home
//! - `handlers::menu`: menu button and menu entries
//! - `handlers::selection`: photobooth and zip selection flows
//!
//! Handlers only mutate navigation and filter state. Anything touching the
//! photo log, the capture surface or the exporter is returned as an
//! [`Effect`] for the session to run, so the state machine can be tested
//! without a device.

use crate::app::state::{Command, Effect, FilterState, Mode, NavigationState};
use tracing::debug;

impl NavigationState {
    /// Apply `command` given the current photo log length
    ///
    /// Commands a mode does not recognize leave every field unchanged.
    pub fn update(
        &mut self,
        command: Command,
        filter: &mut FilterState,
        photo_count: usize,
    ) -> Option<Effect> {
        let before = self.mode.name();

        let effect = match command {
            // ===== Directional =====
            Command::Up => self.handle_up(filter, photo_count),
            Command::Down => self.handle_down(photo_count),
            Command::Left => self.handle_left(photo_count),
            Command::Right => self.handle_right(photo_count),

            // ===== Camera =====
            Command::Shutter => self.handle_shutter(),
            Command::CycleFilter => self.handle_cycle_filter(filter),
            Command::ToggleMirror => self.handle_toggle_mirror(filter),
            Command::ZoomToggle => self.handle_zoom_toggle(photo_count),

            // ===== Mode switching =====
            Command::ToggleGallery => self.handle_toggle_gallery(),
            Command::Home => self.handle_home(),
            Command::MenuButton => self.handle_menu_button(),

            // ===== Confirm =====
            Command::Ok => self.handle_ok(photo_count),
        };

        debug!(
            ?command,
            from = before,
            to = self.mode.name(),
            gallery_cursor = self.gallery_cursor,
            menu_cursor = self.menu_cursor,
            effect = ?effect,
            "Command handled"
        );

        effect
    }

    fn handle_ok(&mut self, photo_count: usize) -> Option<Effect> {
        match self.mode {
            Mode::GalleryGrid => self.handle_inspect(photo_count),
            Mode::Menu => self.handle_menu_ok(photo_count),
            Mode::SelectPhotobooth { .. } | Mode::SelectZip { .. } => {
                self.handle_select_ok(photo_count)
            }
            _ => None,
        }
    }
}
