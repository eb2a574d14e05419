// SPDX-License-Identifier: GPL-3.0-only

//! Navigation state types
//!
//! The mode is a sum type: only the select modes carry a selection, so a
//! selection can never outlive its flow.

use crate::constants::navigation::MENU_ITEMS;
use crate::constants::photobooth::PANEL_COUNT;
use std::fmt;

pub use crate::pipelines::photo::filters::FilterState;

/// Active screen of the camera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Live viewfinder
    #[default]
    Camera,
    /// One photo, full screen
    GallerySingle,
    /// Thumbnail grid
    GalleryGrid,
    /// Export/delete menu
    Menu,
    /// Picking photos for a strip; order defines the panel numbering
    SelectPhotobooth { selection: Vec<usize> },
    /// Picking photos for a zip archive
    SelectZip { selection: Vec<usize> },
}

impl Mode {
    pub fn is_gallery(&self) -> bool {
        matches!(self, Mode::GallerySingle | Mode::GalleryGrid)
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Mode::SelectPhotobooth { .. } | Mode::SelectZip { .. })
    }

    /// Modes that show the gallery cursor as a grid
    pub fn is_grid(&self) -> bool {
        matches!(self, Mode::GalleryGrid) || self.is_select()
    }

    /// Current selection; empty outside the select modes
    pub fn selection(&self) -> &[usize] {
        match self {
            Mode::SelectPhotobooth { selection } | Mode::SelectZip { selection } => selection.as_slice(),
            _ => &[],
        }
    }

    /// 1-based position of `index` in the selection
    pub fn selection_rank(&self, index: usize) -> Option<usize> {
        self.selection()
            .iter()
            .position(|&i| i == index)
            .map(|p| p + 1)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Camera => "camera",
            Mode::GallerySingle => "gallery",
            Mode::GalleryGrid => "grid",
            Mode::Menu => "menu",
            Mode::SelectPhotobooth { .. } => "select-photobooth",
            Mode::SelectZip { .. } => "select-zip",
        }
    }
}

/// Abstract input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Ok,
    MenuButton,
    Home,
    CycleFilter,
    ToggleMirror,
    ToggleGallery,
    ZoomToggle,
    Shutter,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Up,
        Command::Down,
        Command::Left,
        Command::Right,
        Command::Ok,
        Command::MenuButton,
        Command::Home,
        Command::CycleFilter,
        Command::ToggleMirror,
        Command::ToggleGallery,
        Command::ZoomToggle,
        Command::Shutter,
    ];
}

/// Menu entries, in cursor order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Photobooth,
    ExportZip,
    DeleteAll,
    Back,
}

impl MenuItem {
    pub const ALL: [MenuItem; MENU_ITEMS] = [
        MenuItem::Photobooth,
        MenuItem::ExportZip,
        MenuItem::DeleteAll,
        MenuItem::Back,
    ];

    pub fn from_cursor(cursor: usize) -> Option<Self> {
        Self::ALL.get(cursor).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Photobooth => "PHOTOBOOTH",
            MenuItem::ExportZip => "EXPORT ZIP",
            MenuItem::DeleteAll => "DELETE ALL",
            MenuItem::Back => "BACK",
        }
    }
}

/// User-visible warnings raised by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A photobooth strip needs more photos than the log holds
    NotEnoughPhotos { required: usize, available: usize },
    /// A zip export was finished without picking anything
    EmptySelection,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NotEnoughPhotos { required, available } => write!(
                f,
                "You need at least {} photos for a photobooth strip ({} taken)",
                required, available
            ),
            Warning::EmptySelection => write!(f, "No photos selected, nothing to export"),
        }
    }
}

/// Side effect requested by a transition, run by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Take a photo with the current filter state
    Capture,
    /// Composite these log indices, in order
    ExportPhotobooth([usize; PANEL_COUNT]),
    /// Pack these log indices into an archive
    ExportZip(Vec<usize>),
    /// Show a warning and change nothing
    Warn(Warning),
    /// Ask before clearing the log
    ConfirmDeleteAll,
}

/// Mode and cursors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub mode: Mode,
    /// Shared by the gallery and select modes; meaningless on an empty log
    pub gallery_cursor: usize,
    pub menu_cursor: usize,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_item(&self) -> Option<MenuItem> {
        MenuItem::from_cursor(self.menu_cursor)
    }
}
