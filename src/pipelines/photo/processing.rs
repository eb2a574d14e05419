// SPDX-License-Identifier: GPL-3.0-only

//! Frame rendering for captures and preview
//!
//! Converts a live frame into an RGBA raster at native resolution, bakes
//! in horizontal mirroring and applies the active filter.

use super::filters::FilterDef;
use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use image::RgbaImage;
use tracing::debug;

/// Render `frame` with `filter` applied, mirrored horizontally if `mirror`
pub fn render_filtered(
    frame: &CameraFrame,
    filter: &FilterDef,
    mirror: bool,
) -> Result<RgbaImage, PhotoError> {
    let mut raster = frame.to_rgba_image()?;

    if mirror {
        image::imageops::flip_horizontal_in_place(&mut raster);
    }
    filter.apply_in_place(&mut raster);

    debug!(
        width = raster.width(),
        height = raster.height(),
        filter = filter.name,
        mirror,
        "Frame rendered"
    );

    Ok(raster)
}

/// Render a small viewfinder image that fits within `max_width` x `max_height`
///
/// Scaling happens before filtering so the preview stays cheap.
pub fn render_preview(
    frame: &CameraFrame,
    filter: &FilterDef,
    mirror: bool,
    max_width: u32,
    max_height: u32,
) -> Result<RgbaImage, PhotoError> {
    let raster = frame.to_rgba_image()?;
    let mut preview = fit_within(&raster, max_width, max_height);
    if mirror {
        image::imageops::flip_horizontal_in_place(&mut preview);
    }
    filter.apply_in_place(&mut preview);
    Ok(preview)
}

/// Downscale a raster so it fits within `max_width` x `max_height`
pub fn fit_within(raster: &RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return raster.clone();
    }
    let scale = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    image::imageops::thumbnail(raster, new_width, new_height)
}

/// Downscale a raster so its longest edge is at most `max_edge`
pub fn thumbnail(raster: &RgbaImage, max_edge: u32) -> RgbaImage {
    fit_within(raster, max_edge, max_edge)
}
