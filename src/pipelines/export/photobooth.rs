// SPDX-License-Identifier: GPL-3.0-only

//! Photobooth strip compositor
//!
//! Four display images are center-cropped into 4:3 panels stacked on a
//! tall strip. Each panel gets its own date/time stamp drawn locally, so the
//! strip never shows the stamp baked into the export copies.

use crate::constants::photobooth::{
    BACKGROUND, CAPTION, CAPTION_INK, FOOTER_HEIGHT, MARGIN, PANEL_COUNT, PANEL_HEIGHT, PANEL_WIDTH,
    STRIP_WIDTH, strip_height,
};
use crate::errors::ExportError;
use crate::photo_log::PhotoRecord;
use crate::pipelines::photo::font;
use crate::pipelines::photo::stamp::{Area, draw_stamp};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::Arc;
use tracing::debug;

/// Crop the longer axis symmetrically to the target aspect, then scale
pub fn center_crop_resize(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    }

    // Compare src_w / src_h against width / height without floating point
    let (crop_w, crop_h) = if src_w as u64 * height as u64 > src_h as u64 * width as u64 {
        // Source is wider: trim left and right
        (((src_h as u64 * width as u64) / height as u64).max(1) as u32, src_h)
    } else {
        // Source is taller: trim top and bottom
        (src_w, ((src_w as u64 * height as u64) / width as u64).max(1) as u32)
    };
    let x = (src_w - crop_w) / 2;
    let y = (src_h - crop_h) / 2;

    let cropped = imageops::crop_imm(source, x, y, crop_w, crop_h).to_image();
    if (crop_w, crop_h) == (width, height) {
        return cropped;
    }
    imageops::resize(&cropped, width, height, FilterType::Triangle)
}

/// Panel rectangle for slot `slot` (0 = top)
pub fn panel_area(slot: usize) -> Area {
    Area {
        x: (STRIP_WIDTH - PANEL_WIDTH) / 2,
        y: MARGIN + slot as u32 * (PANEL_HEIGHT + MARGIN),
        width: PANEL_WIDTH,
        height: PANEL_HEIGHT,
    }
}

/// Composite the strip for exactly [`PANEL_COUNT`] records, in order
pub fn compose_strip(records: &[Arc<PhotoRecord>]) -> Result<RgbaImage, ExportError> {
    if records.len() != PANEL_COUNT {
        return Err(ExportError::WrongSelection {
            expected: PANEL_COUNT,
            actual: records.len(),
        });
    }

    let background = Rgba([BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 255]);
    let mut strip = RgbaImage::from_pixel(STRIP_WIDTH, strip_height(), background);

    for (slot, record) in records.iter().enumerate() {
        let source = record
            .display_image
            .decode()
            .map_err(|e| ExportError::SurfaceUnavailable(e.to_string()))?;
        let panel = center_crop_resize(&source, PANEL_WIDTH, PANEL_HEIGHT);
        let area = panel_area(slot);

        imageops::replace(&mut strip, &panel, area.x as i64, area.y as i64);
        draw_stamp(&mut strip, area, &record.stamp);

        debug!(slot, id = %record.id, "Panel composited");
    }

    draw_caption(&mut strip);
    Ok(strip)
}

fn draw_caption(strip: &mut RgbaImage) {
    let scale = font::scale_for_height(FOOTER_HEIGHT as f32 * 0.5);
    let width = font::text_width(CAPTION, scale);
    let footer_top = strip.height() - FOOTER_HEIGHT;
    let x = (STRIP_WIDTH.saturating_sub(width) / 2) as i64;
    let y = (footer_top + (FOOTER_HEIGHT - font::line_height(scale)) / 2) as i64;
    let ink = Rgba([CAPTION_INK[0], CAPTION_INK[1], CAPTION_INK[2], 255]);
    font::draw_text(strip, x, y, CAPTION, scale, ink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::stamp::INK;
    use crate::pipelines::photo::encoding::{EncodedImage, encode_jpeg};
    use crate::pipelines::photo::stamp::Timestamp;

    fn stamp(time: &str) -> Timestamp {
        Timestamp {
            date: "02/14/05".into(),
            time: time.into(),
        }
    }

    fn record(raster: &RgbaImage) -> Arc<PhotoRecord> {
        let image = encode_jpeg(raster, 90).unwrap();
        Arc::new(PhotoRecord::new(image.clone(), image, stamp("7:15 PM")))
    }

    /// Blue display copy, red export copy
    fn two_tone_record(time: &str) -> Arc<PhotoRecord> {
        let display = encode_jpeg(&RgbaImage::from_pixel(160, 120, Rgba([0, 0, 255, 255])), 90).unwrap();
        let export = encode_jpeg(&RgbaImage::from_pixel(160, 120, Rgba([255, 0, 0, 255])), 90).unwrap();
        Arc::new(PhotoRecord::new(display, export, stamp(time)))
    }

    fn ink_pixels(strip: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        let ink = [INK[0], INK[1], INK[2], 255];
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| strip.get_pixel(x, y).0 == ink)
            .count()
    }

    /// Pixels of the bottom-right quarter of a panel
    fn corner(strip: &RgbaImage, area: Area) -> Vec<[u8; 4]> {
        let (x0, y0) = (area.x + area.width / 2, area.y + area.height / 2);
        (y0..area.y + area.height)
            .flat_map(|y| (x0..area.x + area.width).map(move |x| strip.get_pixel(x, y).0))
            .collect()
    }

    #[test]
    fn test_center_crop_trims_wide_source_symmetrically() {
        // 16:9 with red bars at the far edges that a 4:3 crop must drop
        let source = RgbaImage::from_fn(160, 90, |x, _| {
            if !(20..140).contains(&x) {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        });
        let panel = center_crop_resize(&source, 120, 90);
        assert_eq!(panel.dimensions(), (120, 90));
        assert_eq!(panel.get_pixel(0, 45).0, [0, 255, 0, 255]);
        assert_eq!(panel.get_pixel(119, 45).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_center_crop_trims_tall_source() {
        let source = RgbaImage::from_fn(90, 160, |_, y| {
            if y < 40 || y >= 120 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let panel = center_crop_resize(&source, 40, 30);
        assert_eq!(panel.dimensions(), (40, 30));
        let centre = panel.get_pixel(20, 15);
        assert!(centre[2] > 200 && centre[0] < 50);
    }

    #[test]
    fn test_panels_do_not_overlap() {
        for slot in 0..PANEL_COUNT - 1 {
            let a = panel_area(slot);
            let b = panel_area(slot + 1);
            assert!(a.y + a.height < b.y);
        }
        let last = panel_area(PANEL_COUNT - 1);
        assert_eq!(last.y + last.height + MARGIN + FOOTER_HEIGHT, strip_height());
    }

    #[test]
    fn test_compose_requires_four() {
        let raster = RgbaImage::from_pixel(64, 48, Rgba([10, 10, 10, 255]));
        let three = vec![record(&raster), record(&raster), record(&raster)];
        assert!(matches!(
            compose_strip(&three),
            Err(ExportError::WrongSelection {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_compose_strip_dimensions() {
        let raster = RgbaImage::from_pixel(128, 72, Rgba([10, 80, 200, 255]));
        let records: Vec<_> = (0..4).map(|_| record(&raster)).collect();
        let strip = compose_strip(&records).unwrap();
        assert_eq!(strip.dimensions(), (STRIP_WIDTH, strip_height()));
        // Margin keeps the background color
        assert_eq!(strip.get_pixel(5, 5).0, [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 255]);
    }

    #[test]
    fn test_strip_uses_display_copy() {
        let records: Vec<_> = (0..4).map(|_| two_tone_record("7:15 PM")).collect();
        let strip = compose_strip(&records).unwrap();

        for slot in 0..PANEL_COUNT {
            let area = panel_area(slot);
            let centre = strip.get_pixel(area.x + area.width / 2, area.y + area.height / 2);
            assert!(centre[2] > 200 && centre[0] < 50, "slot {} shows {:?}", slot, centre);
        }
    }

    #[test]
    fn test_each_panel_is_stamped_bottom_right() {
        let records: Vec<_> = (0..4).map(|_| two_tone_record("7:15 PM")).collect();
        let strip = compose_strip(&records).unwrap();

        for slot in 0..PANEL_COUNT {
            let area = panel_area(slot);
            let (mid_x, mid_y) = (area.x + area.width / 2, area.y + area.height / 2);
            assert!(ink_pixels(&strip, mid_x, mid_y, area.x + area.width, area.y + area.height) > 0);
            assert_eq!(ink_pixels(&strip, area.x, area.y, mid_x, mid_y), 0);
        }
    }

    #[test]
    fn test_panels_carry_their_own_time() {
        let records = vec![
            two_tone_record("7:15 PM"),
            two_tone_record("11:48 AM"),
            two_tone_record("7:15 PM"),
            two_tone_record("7:15 PM"),
        ];
        let strip = compose_strip(&records).unwrap();

        assert_ne!(corner(&strip, panel_area(0)), corner(&strip, panel_area(1)));
        assert_eq!(corner(&strip, panel_area(0)), corner(&strip, panel_area(2)));
    }

    #[test]
    fn test_undecodable_display_image_aborts() {
        let good = two_tone_record("7:15 PM");
        let broken = Arc::new(PhotoRecord::new(
            EncodedImage::from_raw(b"not a jpeg".to_vec(), 160, 120),
            good.export_image.clone(),
            stamp("7:15 PM"),
        ));
        let records = vec![good.clone(), good.clone(), broken, good];
        assert!(matches!(
            compose_strip(&records),
            Err(ExportError::SurfaceUnavailable(_))
        ));
    }
}
