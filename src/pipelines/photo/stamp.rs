// SPDX-License-Identifier: GPL-3.0-only

//! Burned-in date/time imprint
//!
//! The stamp is two right-aligned lines (date above time) anchored to the
//! bottom-right corner of an area, with padding and size proportional to
//! that area. It is always drawn upright, after any mirroring.

use super::font;
use crate::constants::stamp::{
    DATE_FORMAT, FONT_SIZE, INK, PADDING_X, PADDING_Y, SHADOW, SHADOW_OFFSET, TIME_FORMAT,
};
use chrono::{DateTime, TimeZone};
use image::{Rgba, RgbaImage};

/// Date and time strings fixed at the moment of shutter press
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// `MM/DD/YY`
    pub date: String,
    /// `H:MM AM`
    pub time: String,
}

impl Timestamp {
    pub fn at<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: moment.format(DATE_FORMAT).to_string(),
            time: moment.format(TIME_FORMAT).to_string(),
        }
    }

    /// Lines in drawing order, top to bottom
    pub fn lines(&self) -> [&str; 2] {
        [&self.date, &self.time]
    }
}

/// Rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            x: 0,
            y: 0,
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Where the stamp lands inside an area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampLayout {
    pub scale: u32,
    /// Bounding box of both lines, shadow excluded
    pub bounds: Area,
    pub shadow_offset: u32,
}

/// Compute the stamp layout for an area
pub fn layout(area: Area, stamp: &Timestamp) -> StampLayout {
    let scale = font::scale_for_height(area.height as f32 * FONT_SIZE);
    let line_height = font::line_height(scale);
    let line_gap = scale * 2;
    let text_width = stamp
        .lines()
        .iter()
        .map(|line| font::text_width(line, scale))
        .max()
        .unwrap_or(0);
    let text_height = line_height * 2 + line_gap;

    let pad_x = (area.width as f32 * PADDING_X).round() as u32;
    let pad_y = (area.height as f32 * PADDING_Y).round() as u32;

    let right = area.x + area.width.saturating_sub(pad_x);
    let bottom = area.y + area.height.saturating_sub(pad_y);

    StampLayout {
        scale,
        bounds: Area {
            x: right.saturating_sub(text_width).max(area.x),
            y: bottom.saturating_sub(text_height).max(area.y),
            width: text_width,
            height: text_height,
        },
        shadow_offset: ((line_height as f32 * SHADOW_OFFSET).round() as u32).max(1),
    }
}

/// Draw the stamp into `area` of `canvas`
pub fn draw_stamp(canvas: &mut RgbaImage, area: Area, stamp: &Timestamp) {
    let layout = layout(area, stamp);
    let line_step = font::line_height(layout.scale) + layout.scale * 2;
    let right = (layout.bounds.x + layout.bounds.width) as i64;
    let ink = Rgba([INK[0], INK[1], INK[2], 255]);
    let shadow = Rgba([SHADOW[0], SHADOW[1], SHADOW[2], 255]);
    let offset = layout.shadow_offset as i64;

    for (i, line) in stamp.lines().iter().enumerate() {
        // Right-align each line against the shared right edge
        let x = right - font::text_width(line, layout.scale) as i64;
        let y = layout.bounds.y as i64 + i as i64 * line_step as i64;
        font::draw_text(canvas, x + offset, y + offset, line, layout.scale, shadow);
        font::draw_text(canvas, x, y, line, layout.scale, ink);
    }
}

/// Return a copy of `raster` with the stamp burned into its bottom-right corner
pub fn stamp_timestamp(raster: &RgbaImage, stamp: &Timestamp) -> RgbaImage {
    let mut stamped = raster.clone();
    draw_stamp(&mut stamped, Area::of(raster), stamp);
    stamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn moment(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2004, 1, 16, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_format_matches_digicam_imprint() {
        let stamp = Timestamp::at(&moment(12, 4));
        assert_eq!(stamp.date, "01/16/04");
        assert_eq!(stamp.time, "12:04 PM");

        let stamp = Timestamp::at(&moment(9, 30));
        assert_eq!(stamp.time, "9:30 AM");

        let stamp = Timestamp::at(&moment(0, 5));
        assert_eq!(stamp.time, "12:05 AM");
    }

    #[test]
    fn test_layout_anchors_bottom_right_with_padding() {
        let stamp = Timestamp::at(&moment(12, 4));
        let area = Area {
            x: 0,
            y: 0,
            width: 1280,
            height: 720,
        };
        let layout = layout(area, &stamp);

        assert_eq!(layout.scale, 5);
        assert_eq!(layout.bounds.x + layout.bounds.width, 1280 - 64);
        assert_eq!(layout.bounds.y + layout.bounds.height, 720 - 36);
    }

    #[test]
    fn test_stamp_only_touches_its_corner() {
        let raster = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 255, 255]));
        let stamp = Timestamp::at(&moment(3, 45));
        let stamped = stamp_timestamp(&raster, &stamp);

        assert_ne!(raster, stamped);
        // Top-left quadrant is untouched
        for y in 0..150 {
            for x in 0..200 {
                assert_eq!(stamped.get_pixel(x, y), raster.get_pixel(x, y));
            }
        }
        assert!(stamped.pixels().any(|p| p.0 == [INK[0], INK[1], INK[2], 255]));
    }
}
