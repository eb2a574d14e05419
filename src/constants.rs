// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application name used for directories and file prefixes
pub const APP_NAME: &str = "PocketPix";

/// Capture constants
pub mod capture {
    /// Resolution requested from the capture device (not guaranteed)
    pub const REQUESTED_WIDTH: u32 = 1280;
    pub const REQUESTED_HEIGHT: u32 = 720;

    /// Lossy encoding quality for both stored variants (0-100)
    pub const JPEG_QUALITY: u8 = 90;

    /// Frame buffers kept by the V4L2 mmap stream
    pub const V4L2_BUFFER_COUNT: u32 = 4;
}

/// Timestamp stamp geometry, as fractions of the raster size
pub mod stamp {
    /// Padding from the right edge, fraction of width
    pub const PADDING_X: f32 = 0.05;
    /// Padding from the bottom edge, fraction of height
    pub const PADDING_Y: f32 = 0.05;
    /// Line height, fraction of raster height
    pub const FONT_SIZE: f32 = 0.045;
    /// Drop shadow offset, fraction of the line height
    pub const SHADOW_OFFSET: f32 = 0.08;

    /// Digital orange of a 2000s date imprint
    pub const INK: [u8; 3] = [255, 159, 28];
    /// Shadow color
    pub const SHADOW: [u8; 3] = [40, 16, 0];

    /// `MM/DD/YY`
    pub const DATE_FORMAT: &str = "%m/%d/%y";
    /// `H:MM AM/PM`
    pub const TIME_FORMAT: &str = "%-I:%M %p";
}

/// Photobooth strip layout
pub mod photobooth {
    /// Number of photos in a strip
    pub const PANEL_COUNT: usize = 4;
    pub const STRIP_WIDTH: u32 = 640;
    pub const PANEL_WIDTH: u32 = 600;
    pub const PANEL_HEIGHT: u32 = 450;
    /// Border around and between panels
    pub const MARGIN: u32 = 20;
    /// Caption area below the last panel
    pub const FOOTER_HEIGHT: u32 = 60;
    pub const BACKGROUND: [u8; 3] = [255, 240, 245];
    pub const CAPTION_INK: [u8; 3] = [255, 20, 147];
    pub const CAPTION: &str = "POCKETPIX";

    /// Total strip height for [`PANEL_COUNT`] panels
    pub const fn strip_height() -> u32 {
        MARGIN + (PANEL_HEIGHT + MARGIN) * PANEL_COUNT as u32 + FOOTER_HEIGHT
    }
}

/// Export file naming
pub mod export {
    /// Offset added to a photo log index to build its archive entry number
    pub const IMAGE_NUMBER_BASE: usize = 1000;
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Archive entry name for a photo log index
    pub fn entry_name(index: usize) -> String {
        format!("{}_IMG_{}.jpg", super::APP_NAME, IMAGE_NUMBER_BASE + index)
    }
}

/// Navigation constants
pub mod navigation {
    /// Columns in the gallery grid; up/down move by one row
    pub const GRID_COLUMNS: usize = 3;
    /// Number of menu entries
    pub const MENU_ITEMS: usize = 4;
}

/// Terminal front end timing
pub mod terminal {
    use super::Duration;

    /// Input poll interval (also the preview refresh rate)
    pub const POLL_INTERVAL: Duration = Duration::from_millis(33);
    /// How long the white capture flash stays on screen
    pub const FLASH_DURATION: Duration = Duration::from_millis(150);
    /// Longest edge of cached gallery thumbnails
    pub const THUMBNAIL_SIZE: u32 = 160;
}
